//! Cache Backend Trait
//!
//! The capability set every cache exposes, so a registry can hold different
//! backends side by side.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;

// == Cache Trait ==
/// A key/value cache with per-entry TTL.
///
/// A zero `ttl` stores an entry that never expires. Lookups of a missing or
/// expired key return `None` (or `false`) rather than an error.
pub trait Cache<V>: Send + Sync {
    /// Inserts or overwrites the entry for `key`.
    fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()>;

    /// Returns the live value for `key`, if any.
    fn get(&self, key: &str) -> Option<Arc<V>>;

    /// Returns true when [`Cache::get`] would return a value.
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`. Deleting an absent key succeeds.
    fn del(&self, key: &str) -> Result<()>;

    /// Removes every entry.
    fn clear(&self) -> Result<()>;

    /// Stores an entry that never expires.
    fn set_forever(&self, key: &str, value: V) -> Result<()> {
        self.set(key, value, Duration::ZERO)
    }

    /// Returns the live values among `keys`; missing and expired keys are left out.
    fn get_many(&self, keys: &[&str]) -> HashMap<String, Arc<V>> {
        keys.iter()
            .filter_map(|key| self.get(key).map(|value| ((*key).to_string(), value)))
            .collect()
    }

    /// Stores every item with the same `ttl`.
    fn set_many(&self, items: Vec<(String, V)>, ttl: Duration) -> Result<()> {
        for (key, value) in items {
            self.set(&key, value, ttl)?;
        }
        Ok(())
    }

    /// Removes every key in `keys`.
    fn del_many(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.del(key)?;
        }
        Ok(())
    }
}

/// Shared handles are caches too, so a store can be registered by name while
/// its owner keeps a reference (for example to run a sweeper on it).
impl<V, C> Cache<V> for Arc<C>
where
    C: Cache<V> + ?Sized,
{
    fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()> {
        (**self).set(key, value, ttl)
    }

    fn get(&self, key: &str) -> Option<Arc<V>> {
        (**self).get(key)
    }

    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }

    fn del(&self, key: &str) -> Result<()> {
        (**self).del(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }

    fn get_many(&self, keys: &[&str]) -> HashMap<String, Arc<V>> {
        (**self).get_many(keys)
    }

    fn set_many(&self, items: Vec<(String, V)>, ttl: Duration) -> Result<()> {
        (**self).set_many(items, ttl)
    }

    fn del_many(&self, keys: &[&str]) -> Result<()> {
        (**self).del_many(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Minimal backend relying on every provided method.
    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<String, Arc<String>>>,
    }

    impl Cache<String> for MapCache {
        fn set(&self, key: &str, value: String, _ttl: Duration) -> Result<()> {
            self.entries.lock().insert(key.to_string(), Arc::new(value));
            Ok(())
        }

        fn get(&self, key: &str) -> Option<Arc<String>> {
            self.entries.lock().get(key).cloned()
        }

        fn del(&self, key: &str) -> Result<()> {
            self.entries.lock().remove(key);
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            self.entries.lock().clear();
            Ok(())
        }
    }

    #[test]
    fn test_provided_methods() {
        let cache = MapCache::default();

        cache
            .set_many(
                vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())],
                Duration::from_secs(10),
            )
            .unwrap();
        cache.set_forever("c", "3".to_string()).unwrap();

        assert!(cache.has("a"));
        let found = cache.get_many(&["a", "c", "missing"]);
        assert_eq!(found.len(), 2);
        assert_eq!(found["c"].as_str(), "3");

        cache.del_many(&["a", "b"]).unwrap();
        assert!(!cache.has("a"));
        assert!(!cache.has("b"));
        assert!(cache.has("c"));
    }

    #[test]
    fn test_arc_forwards() {
        let cache: Arc<dyn Cache<String>> = Arc::new(MapCache::default());
        let shared = Arc::clone(&cache);

        shared.set("k", "v".to_string(), Duration::ZERO).unwrap();
        assert_eq!(cache.get("k").as_deref().map(String::as_str), Some("v"));

        shared.clear().unwrap();
        assert!(!cache.has("k"));
    }
}
