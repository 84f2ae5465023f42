//! Cache Statistics Module
//!
//! Snapshot of a cache's contents and its hit/miss/eviction counters.

use serde::Serialize;

// == Counters ==
/// Running counters kept by the service between snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl Counters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }
}

// == Cache Stats ==
/// Post-cleanup view of a cache, returned by `CacheService::get_stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of live entries
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Live keys, sorted
    pub keys: Vec<String>,
    /// Reads that returned a value
    pub hits: u64,
    /// Reads that found nothing usable (absent, expired or of another type)
    pub misses: u64,
    /// Entries removed to make room for a new key
    pub evictions: u64,
    /// Entries removed because their TTL had elapsed
    pub expirations: u64,
}

impl CacheStats {
    pub(crate) fn new(keys: Vec<String>, max_size: usize, counters: Counters) -> Self {
        Self {
            size: keys.len(),
            max_size,
            keys,
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
            expirations: counters.expirations,
        }
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
