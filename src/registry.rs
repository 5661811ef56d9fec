//! Cache Registry Module
//!
//! Name-based dispatch over any number of caches. The registry holds no
//! entries itself; every call is forwarded to the cache bound to the name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::debug;

use crate::cache::Cache;
use crate::error::{CacheError, Result};

// == Registry Config ==
/// Registry behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, calls naming an unregistered cache are served by the
    /// default cache (see [`Registry::set_default`]) instead of failing.
    pub fallback_to_default: bool,
}

struct RegistryInner<V> {
    caches: HashMap<String, Arc<dyn Cache<V>>>,
    default_name: Option<String>,
}

// == Registry ==
/// Maps names to caches and forwards operations by name.
///
/// Registering a cache by value makes the registry its only owner. Register
/// an `Arc` instead to keep a handle outside the registry.
pub struct Registry<V> {
    inner: RwLock<RegistryInner<V>>,
    config: RegistryConfig,
}

impl<V: 'static> Registry<V> {
    /// Creates an empty registry that fails on unknown names.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                caches: HashMap::new(),
                default_name: None,
            }),
            config,
        }
    }

    // == Lifecycle ==
    /// Binds `name` to `cache`, dropping any cache previously bound to it.
    ///
    /// The replaced cache is released, not cleared.
    pub fn register<C>(&self, name: impl Into<String>, cache: C)
    where
        C: Cache<V> + 'static,
    {
        let name = name.into();
        let replaced = {
            let mut inner = self.inner.write();
            inner.caches.insert(name.clone(), Arc::new(cache))
        };

        if replaced.is_some() {
            debug!(name = %name, "replaced registered cache");
        } else {
            debug!(name = %name, "registered cache");
        }
    }

    /// Removes the binding for `name`. Returns whether one existed.
    pub fn unregister(&self, name: &str) -> bool {
        let mut inner = self.inner.write();
        if inner.default_name.as_deref() == Some(name) {
            inner.default_name = None;
        }
        inner.caches.remove(name).is_some()
    }

    /// Removes every binding and the default selection.
    pub fn unregister_all(&self) {
        let mut inner = self.inner.write();
        inner.caches.clear();
        inner.default_name = None;
    }

    /// Selects the registered cache `name` as the default.
    pub fn set_default(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.caches.contains_key(name) {
            return Err(CacheError::NotFound(name.to_string()));
        }
        inner.default_name = Some(name.to_string());
        Ok(())
    }

    /// Returns the name of the default cache, if one is selected.
    pub fn default_name(&self) -> Option<String> {
        self.inner.read().default_name.clone()
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().caches.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().caches.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.read().caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().caches.is_empty()
    }

    // == Lookup ==
    /// Resolves `name` to its cache.
    ///
    /// The registry lock is released before the handle is returned, so
    /// forwarded calls never run under it.
    pub fn cache(&self, name: &str) -> Result<Arc<dyn Cache<V>>> {
        let inner = self.inner.read();

        let direct = inner.caches.get(name);
        let resolved = match direct {
            Some(cache) => Some(cache),
            None if self.config.fallback_to_default => inner
                .default_name
                .as_deref()
                .and_then(|default| inner.caches.get(default)),
            None => None,
        };

        resolved
            .cloned()
            .ok_or_else(|| CacheError::NotFound(name.to_string()))
    }

    // == Dispatch ==
    pub fn set(&self, name: &str, key: &str, value: V, ttl: Duration) -> Result<()> {
        self.cache(name)?.set(key, value, ttl)
    }

    pub fn set_forever(&self, name: &str, key: &str, value: V) -> Result<()> {
        self.cache(name)?.set_forever(key, value)
    }

    pub fn get(&self, name: &str, key: &str) -> Result<Option<Arc<V>>> {
        Ok(self.cache(name)?.get(key))
    }

    pub fn has(&self, name: &str, key: &str) -> Result<bool> {
        Ok(self.cache(name)?.has(key))
    }

    pub fn del(&self, name: &str, key: &str) -> Result<()> {
        self.cache(name)?.del(key)
    }

    pub fn clear(&self, name: &str) -> Result<()> {
        self.cache(name)?.clear()
    }

    pub fn get_many(&self, name: &str, keys: &[&str]) -> Result<HashMap<String, Arc<V>>> {
        Ok(self.cache(name)?.get_many(keys))
    }

    pub fn set_many(&self, name: &str, items: Vec<(String, V)>, ttl: Duration) -> Result<()> {
        self.cache(name)?.set_many(items, ttl)
    }

    pub fn del_many(&self, name: &str, keys: &[&str]) -> Result<()> {
        self.cache(name)?.del_many(keys)
    }

    /// Clears every registered cache, stopping at the first failure.
    pub fn clear_all(&self) -> Result<()> {
        let caches: Vec<Arc<dyn Cache<V>>> = self.inner.read().caches.values().cloned().collect();
        for cache in caches {
            cache.clear()?;
        }
        Ok(())
    }
}

impl<V: 'static> Default for Registry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: 'static> fmt::Debug for Registry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.names())
            .field("default_name", &self.default_name())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, ManualClock};

    #[test]
    fn test_registry_dispatch_matches_store() {
        let registry = Registry::new();
        let store: Arc<CacheStore<String>> = Arc::new(CacheStore::new());
        registry.register("memory", Arc::clone(&store));

        registry
            .set("memory", "key1", "value1".to_string(), Duration::from_secs(60))
            .unwrap();

        assert!(registry.has("memory", "key1").unwrap());
        assert_eq!(registry.get("memory", "key1").unwrap(), store.get("key1"));

        store.del("key1").unwrap();
        assert_eq!(registry.get("memory", "key1").unwrap(), None);
    }

    #[test]
    fn test_registry_unknown_name() {
        let registry: Registry<String> = Registry::new();

        assert!(matches!(registry.get("nope", "k"), Err(CacheError::NotFound(_))));
        assert!(matches!(registry.has("nope", "k"), Err(CacheError::NotFound(_))));
        assert!(matches!(registry.del("nope", "k"), Err(CacheError::NotFound(_))));
        assert!(matches!(
            registry.set("nope", "k", "v".to_string(), Duration::ZERO),
            Err(CacheError::NotFound(_))
        ));
    }

    #[test]
    fn test_registry_register_replaces_without_clearing() {
        let registry: Registry<i32> = Registry::new();
        let first = Arc::new(CacheStore::new());
        first.set_forever("key", 1).unwrap();

        registry.register("memory", Arc::clone(&first));
        registry.register("memory", CacheStore::new());

        assert_eq!(registry.len(), 1);
        assert!(!registry.has("memory", "key").unwrap());
        assert!(first.has("key"), "replaced store keeps its entries");
        assert_eq!(Arc::strong_count(&first), 1);
    }

    #[test]
    fn test_registry_unregister() {
        let registry = Registry::new();
        registry.register("a", CacheStore::<u32>::new());
        registry.register("b", CacheStore::<u32>::new());

        assert!(registry.unregister("a"));
        assert!(!registry.unregister("a"));
        assert_eq!(registry.names(), vec!["b".to_string()]);

        registry.unregister_all();
        assert!(registry.is_empty());
        assert!(matches!(registry.get("b", "k"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_registry_fallback_requires_config() {
        let strict: Registry<u32> = Registry::new();
        strict.register("memory", CacheStore::new());
        strict.set_default("memory").unwrap();
        assert!(matches!(strict.get("other", "k"), Err(CacheError::NotFound(_))));

        let lenient: Registry<i32> = Registry::with_config(RegistryConfig {
            fallback_to_default: true,
        });
        lenient.register("memory", CacheStore::new());
        assert!(matches!(lenient.get("other", "k"), Err(CacheError::NotFound(_))));

        lenient.set_default("memory").unwrap();
        lenient.set("other", "k", 7, Duration::ZERO).unwrap();
        assert_eq!(lenient.get("memory", "k").unwrap().as_deref(), Some(&7));
    }

    #[test]
    fn test_registry_set_default_unknown() {
        let registry: Registry<u32> = Registry::new();
        assert!(matches!(registry.set_default("memory"), Err(CacheError::NotFound(_))));
        assert_eq!(registry.default_name(), None);
    }

    #[test]
    fn test_registry_unregister_default() {
        let registry: Registry<u32> = Registry::new();
        registry.register("memory", CacheStore::new());
        registry.set_default("memory").unwrap();

        registry.unregister("memory");
        assert_eq!(registry.default_name(), None);
    }

    #[test]
    fn test_registry_expiry_passes_through() {
        let clock = ManualClock::new();
        let registry: Registry<&str> = Registry::new();
        registry.register("memory", CacheStore::with_clock(clock.clone()));

        registry
            .set("memory", "name", "cache value", Duration::from_secs(2))
            .unwrap();
        clock.advance(Duration::from_secs(2));

        assert_eq!(registry.get("memory", "name").unwrap(), None);
    }

    #[test]
    fn test_registry_many_and_clear_all() {
        let registry: Registry<i32> = Registry::new();
        registry.register("a", CacheStore::new());
        registry.register("b", CacheStore::new());

        registry
            .set_many("a", vec![("x".to_string(), 1), ("y".to_string(), 2)], Duration::ZERO)
            .unwrap();
        registry.set_forever("b", "z", 3).unwrap();
        assert_eq!(registry.get_many("a", &["x", "y", "z"]).unwrap().len(), 2);

        registry.del_many("a", &["x"]).unwrap();
        assert!(!registry.has("a", "x").unwrap());

        registry.clear_all().unwrap();
        assert!(!registry.has("a", "y").unwrap());
        assert!(!registry.has("b", "z").unwrap());
    }
}
