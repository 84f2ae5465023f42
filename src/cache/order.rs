//! Eviction Order Module
//!
//! Tracks which key gives way first when the cache is full.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// Queue position: the instant a key was stamped, then a per-store sequence
/// number so keys stamped at the same instant keep their stamping order.
type Stamp = (Instant, u64);

// == Eviction Order ==
/// Keys ordered by the instant they were last stamped.
///
/// The service stamps a key with its `stored_at` on every write, and under
/// `LeastRecentlyUsed` also with the read time on every hit. The next
/// eviction candidate is the key with the smallest stamp.
///
/// `touch`, `remove` and `evict_oldest` are O(log n) through the ordered
/// `queue`; `stamps` maps each key back to its position.
#[derive(Debug, Default)]
pub struct EvictionOrder {
    queue: BTreeMap<Stamp, String>,
    stamps: HashMap<String, Stamp>,
    next_seq: u64,
}

impl EvictionOrder {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Stamps `key` with `at`, replacing any earlier stamp.
    pub fn touch(&mut self, key: &str, at: Instant) {
        self.remove(key);

        let stamp = (at, self.next_seq);
        self.next_seq += 1;
        self.queue.insert(stamp, key.to_string());
        self.stamps.insert(key.to_string(), stamp);
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        if let Some(stamp) = self.stamps.remove(key) {
            self.queue.remove(&stamp);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the key with the smallest stamp.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.queue.pop_first()?;
        self.stamps.remove(&key);
        Some(key)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.stamps.clear();
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }
}
