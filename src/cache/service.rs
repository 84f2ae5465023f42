//! Cache Service Module
//!
//! Main cache engine combining HashMap storage with write-order eviction and
//! lazy TTL expiration.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::entry::SharedValue;
use crate::cache::stats::Counters;
use crate::cache::{CacheEntry, CacheStats, Clock, EvictionOrder, SystemClock};
use crate::config::{CacheConfig, EvictionPolicy};
use crate::error::{CacheError, Result};

// == Store ==
/// State guarded by the service mutex.
#[derive(Debug, Default)]
struct Store {
    entries: HashMap<String, CacheEntry>,
    order: EvictionOrder,
    counters: Counters,
}

impl Store {
    fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.order.remove(key);
        }
        removed
    }

    /// Returns the entry under `key` if it is live, dropping it if expired.
    fn live_entry(&mut self, key: &str, now: Instant) -> Option<CacheEntry> {
        let expired = self.entries.get(key)?.is_expired(now);
        if expired {
            self.remove(key);
            self.counters.record_expirations(1);
            return None;
        }
        self.entries.get(key).cloned()
    }

    /// Removes every expired entry. Returns the number removed.
    fn cleanup(&mut self, now: Instant) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            self.remove(&key);
        }

        if count > 0 {
            self.counters.record_expirations(count);
            debug!("Cache cleanup: removed {} expired entries", count);
        }
        debug_assert_eq!(self.order.len(), self.entries.len());
        count
    }

    fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

// == Cache Service ==
/// Capacity-bounded key/value cache with per-entry TTL.
///
/// Values of any `'static + Send + Sync` type are stored behind an `Arc` and
/// read back with a checked downcast. Expired entries are removed lazily:
/// `get`, `has` and `delete` check the single key they touch, while `set`,
/// `size`, `keys` and `get_stats` sweep the whole store first.
///
/// Cloning the service yields another handle to the same store. Separate
/// calls to [`CacheService::new`] produce independent stores.
#[derive(Clone)]
pub struct CacheService {
    store: Arc<Mutex<Store>>,
    config: Arc<CacheConfig>,
    clock: Arc<dyn Clock>,
}

impl CacheService {
    // == Constructor ==
    /// Creates a cache driven by the system clock.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }

    /// Creates a cache reading time from `clock`.
    pub fn with_clock<C: Clock + 'static>(config: CacheConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: Arc::new(Mutex::new(Store::default())),
            config: Arc::new(config),
            clock: Arc::new(clock),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // No operation leaves the store half-updated across a panic point, so a
    // poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Set ==
    /// Stores `data` under `key`, using the default TTL when `ttl` is None.
    ///
    /// Overwriting an existing key replaces the value and resets its age. If
    /// the cache is still full after dropping expired entries, the entry with
    /// the oldest write time is evicted first.
    ///
    /// # Errors
    /// `InvalidKey` for an empty key, `InvalidTtl` for a zero TTL.
    pub fn set<T>(&self, key: impl Into<String>, data: T, ttl: Option<Duration>) -> Result<()>
    where
        T: Any + Send + Sync,
    {
        self.set_shared(key, Arc::new(data), ttl)
    }

    /// Like [`set`](Self::set), but stores an existing `Arc` so the caller
    /// and later readers share the same allocation.
    pub fn set_shared<T>(
        &self,
        key: impl Into<String>,
        data: Arc<T>,
        ttl: Option<Duration>,
    ) -> Result<()>
    where
        T: Any + Send + Sync,
    {
        self.insert(key.into(), data, ttl)
    }

    fn insert(&self, key: String, data: SharedValue, ttl: Option<Duration>) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey("key must not be empty".to_string()));
        }
        if ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Err(CacheError::InvalidTtl(format!(
                "ttl for key '{}' must be greater than zero",
                key
            )));
        }

        let now = self.clock.now();
        let mut store = self.lock();
        store.cleanup(now);

        if !store.entries.contains_key(&key) && store.entries.len() >= self.config.max_size {
            if let Some(evicted_key) = store.order.evict_oldest() {
                store.entries.remove(&evicted_key);
                store.counters.record_eviction();
                debug!("Evicted '{}' to make room for '{}'", evicted_key, key);
            }
        }

        let ttl = ttl.unwrap_or(self.config.ttl);
        store
            .entries
            .insert(key.clone(), CacheEntry::new(data, now, ttl));
        store.order.touch(&key, now);

        Ok(())
    }

    // == Get ==
    /// Returns the live value stored under `key`.
    ///
    /// None if the key is absent, expired (the entry is dropped) or holds a
    /// value of another type (the entry is kept).
    pub fn get<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.try_get(key).unwrap_or(None)
    }

    /// Like [`get`](Self::get), but reports a value of another type as
    /// `CacheError::TypeMismatch` instead of None.
    pub fn try_get<T>(&self, key: &str) -> Result<Option<Arc<T>>>
    where
        T: Any + Send + Sync,
    {
        let now = self.clock.now();
        let mut store = self.lock();

        let Some(entry) = store.live_entry(key, now) else {
            store.counters.record_miss();
            return Ok(None);
        };

        match entry.downcast::<T>() {
            Some(value) => {
                store.counters.record_hit();
                if self.config.eviction == EvictionPolicy::LeastRecentlyUsed {
                    store.order.touch(key, now);
                }
                Ok(Some(value))
            }
            None => {
                store.counters.record_miss();
                Err(CacheError::TypeMismatch {
                    key: key.to_string(),
                    expected: type_name::<T>(),
                })
            }
        }
    }

    // == Has ==
    /// Whether a live entry exists under `key`. An expired match is dropped.
    pub fn has(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.lock().live_entry(key, now).is_some()
    }

    /// Remaining lifetime of the live entry under `key`.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now();
        self.lock()
            .live_entry(key, now)
            .map(|entry| entry.ttl_remaining(now))
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().remove(key)
    }

    /// Removes every key in `keys` under a single lock. Returns the number of
    /// entries removed; absent keys are skipped.
    pub fn delete_many<I>(&self, keys: I) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut store = self.lock();
        let mut removed = 0;
        for key in keys {
            if store.remove(key.as_ref()) {
                removed += 1;
            }
        }

        debug!("Deleted {} entries by key list", removed);
        removed
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&self) {
        let mut store = self.lock();
        store.entries.clear();
        store.order.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        self.lock().cleanup(now)
    }

    // == Size ==
    /// Drops expired entries, then returns the number left.
    pub fn size(&self) -> usize {
        let now = self.clock.now();
        let mut store = self.lock();
        store.cleanup(now);
        store.entries.len()
    }

    // == Keys ==
    /// Drops expired entries, then returns the live keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let now = self.clock.now();
        let mut store = self.lock();
        store.cleanup(now);
        store.sorted_keys()
    }

    // == Stats ==
    /// Drops expired entries, then returns the current statistics.
    pub fn get_stats(&self) -> CacheStats {
        let now = self.clock.now();
        let mut store = self.lock();
        store.cleanup(now);
        CacheStats::new(store.sorted_keys(), self.config.max_size, store.counters)
    }
}

impl fmt::Debug for CacheService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
