//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Type-erased payload shared between the store and its readers.
pub(crate) type SharedValue = Arc<dyn Any + Send + Sync>;

// == Cache Entry ==
/// A stored value plus the time it was written and how long it lives.
#[derive(Clone)]
pub struct CacheEntry {
    /// The stored value
    data: SharedValue,
    /// Time of insertion or last overwrite
    pub stored_at: Instant,
    /// Lifetime counted from `stored_at`
    pub ttl: Duration,
}

impl CacheEntry {
    // == Constructor ==
    pub(crate) fn new(data: SharedValue, stored_at: Instant, ttl: Duration) -> Self {
        Self {
            data,
            stored_at,
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry aged exactly `ttl` is still live; it
    /// expires once its age is strictly greater than `ttl`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now`, `Duration::ZERO` once elapsed.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.ttl
            .saturating_sub(now.saturating_duration_since(self.stored_at))
    }

    // == Downcast ==
    /// Returns the payload as `T`, or None if it was stored as another type.
    pub(crate) fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.data).downcast::<T>().ok()
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("stored_at", &self.stored_at)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
