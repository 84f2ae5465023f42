//! Cache Module
//!
//! Provides in-memory caching with per-entry TTL, lazy expiration and
//! capacity-bounded eviction.

mod clock;
mod entry;
mod order;
mod service;
mod stats;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub(crate) use entry::CacheEntry;
pub(crate) use order::EvictionOrder;
pub use service::CacheService;
pub use stats::CacheStats;
