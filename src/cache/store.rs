//! Cache Store Module
//!
//! Main cache engine: a HashMap index with lazy TTL expiration behind a
//! single lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{Cache, CacheEntry, CacheStats, Clock, SystemClock, Ttl};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Store Inner ==
/// State guarded by the store lock.
#[derive(Debug)]
struct StoreInner<V> {
    /// Key-value index
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
}

impl<V> StoreInner<V> {
    /// Returns the live value for `key`, evicting it if it expired.
    fn lookup(&mut self, key: &str, now: Instant) -> Option<Arc<V>> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!(key, "evicted expired entry on access");
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).map(|entry| Arc::clone(&entry.value))
    }

    fn insert(&mut self, key: String, entry: CacheEntry<V>, now: Instant) {
        if let Some(old) = self.entries.insert(key, entry) {
            if old.is_expired(now) {
                self.stats.record_expirations(1);
            }
        }
    }
}

// == Cache Store ==
/// Thread-safe in-memory cache with per-entry TTL.
///
/// Expired entries are reclaimed lazily: `get`, `has`, `ttl` and an
/// overwriting `set` remove any expired entry they touch. Nothing runs in the
/// background unless [`crate::tasks::spawn_sweeper`] is started on the store.
#[derive(Debug)]
pub struct CacheStore<V> {
    inner: Mutex<StoreInner<V>>,
    clock: Arc<dyn Clock>,
}

impl<V> CacheStore<V> {
    // == Constructors ==
    /// Creates an empty store on the system clock.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty store pre-sized for `capacity` entries.
    ///
    /// The capacity is a sizing hint only; the store never evicts to honor it.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_clock(capacity, SystemClock)
    }

    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self::with_capacity_and_clock(0, clock)
    }

    pub fn with_capacity_and_clock(capacity: usize, clock: impl Clock + 'static) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                entries: HashMap::with_capacity(capacity),
                stats: CacheStats::new(),
            }),
            clock: Arc::new(clock),
        }
    }

    /// Creates a store sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// A zero `ttl` means the entry never expires. An existing entry for the
    /// key is replaced along with its expiry.
    ///
    /// # Errors
    /// `InvalidArgument` when `ttl` is too large to form a deadline; any
    /// existing entry for `key` is left as it was.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) -> Result<()> {
        let key = key.into();
        let mut inner = self.inner.lock();
        let now = self.clock.now();

        let entry = CacheEntry::new(value, now, ttl).ok_or_else(|| ttl_out_of_range(ttl))?;
        inner.insert(key, entry, now);

        Ok(())
    }

    /// Stores a key-value pair that never expires.
    pub fn set_forever(&self, key: impl Into<String>, value: V) -> Result<()> {
        self.set(key, value, Duration::ZERO)
    }

    /// Stores every item with the same `ttl` under one lock acquisition.
    ///
    /// The TTL is validated before anything is written.
    pub fn set_many<K>(&self, items: impl IntoIterator<Item = (K, V)>, ttl: Duration) -> Result<()>
    where
        K: Into<String>,
    {
        let mut inner = self.inner.lock();
        let now = self.clock.now();
        if now.checked_add(ttl).is_none() {
            return Err(ttl_out_of_range(ttl));
        }

        for (key, value) in items {
            let entry = CacheEntry::new(value, now, ttl).ok_or_else(|| ttl_out_of_range(ttl))?;
            inner.insert(key.into(), entry, now);
        }

        Ok(())
    }

    // == Get ==
    /// Retrieves the value for `key`.
    ///
    /// Returns `None` when the key is absent or expired; an expired entry is
    /// removed from the index.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let mut inner = self.inner.lock();
        let now = self.clock.now();
        inner.lookup(key, now)
    }

    /// Retrieves the live values among `keys` under one lock acquisition.
    pub fn get_many<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> HashMap<String, Arc<V>> {
        let mut inner = self.inner.lock();
        let now = self.clock.now();

        keys.into_iter()
            .filter_map(|key| inner.lookup(key, now).map(|value| (key.to_string(), value)))
            .collect()
    }

    // == Has ==
    /// Returns true if `key` holds a live value.
    ///
    /// Same check and same lazy eviction as [`CacheStore::get`].
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Time To Live ==
    /// Returns the remaining lifetime of `key`, or `None` if absent or expired.
    pub fn ttl(&self, key: &str) -> Option<Ttl> {
        let mut inner = self.inner.lock();
        let now = self.clock.now();
        inner.lookup(key, now)?;
        inner.entries.get(key).map(|entry| entry.ttl_remaining(now))
    }

    // == Delete ==
    /// Removes an entry by key. Deleting an absent key is not an error.
    pub fn del(&self, key: &str) -> Result<()> {
        self.inner.lock().entries.remove(key);
        Ok(())
    }

    /// Removes every key in `keys` under one lock acquisition.
    pub fn del_many<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let mut inner = self.inner.lock();
        for key in keys {
            inner.entries.remove(key);
        }
        Ok(())
    }

    // == Clear ==
    /// Removes all entries. Safe to call repeatedly.
    pub fn clear(&self) -> Result<()> {
        self.inner.lock().entries.clear();
        Ok(())
    }

    // == Purge Expired ==
    /// Removes every expired entry from the index.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let mut inner = self.inner.lock();
        let now = self.clock.now();

        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - inner.entries.len();

        inner.stats.record_expirations(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.total_entries = inner.entries.len();
        stats
    }

    // == Length ==
    /// Returns the number of entries in the index, including expired
    /// entries that have not been touched since they expired.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Returns true if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Send + Sync> Cache<V> for CacheStore<V> {
    fn set(&self, key: &str, value: V, ttl: Duration) -> Result<()> {
        CacheStore::set(self, key, value, ttl)
    }

    fn get(&self, key: &str) -> Option<Arc<V>> {
        CacheStore::get(self, key)
    }

    fn has(&self, key: &str) -> bool {
        CacheStore::has(self, key)
    }

    fn del(&self, key: &str) -> Result<()> {
        CacheStore::del(self, key)
    }

    fn clear(&self) -> Result<()> {
        CacheStore::clear(self)
    }

    fn get_many(&self, keys: &[&str]) -> HashMap<String, Arc<V>> {
        CacheStore::get_many(self, keys.iter().copied())
    }

    fn set_many(&self, items: Vec<(String, V)>, ttl: Duration) -> Result<()> {
        CacheStore::set_many(self, items, ttl)
    }

    fn del_many(&self, keys: &[&str]) -> Result<()> {
        CacheStore::del_many(self, keys.iter().copied())
    }
}

fn ttl_out_of_range(ttl: Duration) -> CacheError {
    CacheError::InvalidArgument(format!("ttl {:?} is out of range", ttl))
}
