//! Catalog Cache - in-memory caching for the catalog admin console
//!
//! Provides a capacity-bounded cache with per-entry TTL and lazy expiration,
//! memoization of sync and async calls through it, and key helpers.

pub mod cache;
pub mod config;
pub mod error;
pub mod memoize;
pub mod registry;
pub mod utils;

pub use cache::{CacheService, CacheStats, Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, Config, EvictionPolicy};
pub use error::{CacheError, Result};
pub use memoize::{with_cache, Computation, Memoized, Memoizer};
pub use registry::CacheRegistry;
