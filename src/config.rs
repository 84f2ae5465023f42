//! Configuration Module
//!
//! Cache profiles and loading of the named profiles from environment variables.

use std::env;
use std::time::Duration;

use serde::Serialize;

use crate::error::{CacheError, Result};

const MINUTE: Duration = Duration::from_secs(60);

/// Default TTL for entries inserted without an explicit TTL
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default capacity of a cache
pub const DEFAULT_MAX_SIZE: usize = 100;

// == Eviction Policy ==
/// Chooses which entry gives way when a full cache receives a new key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Evict the entry with the oldest insertion/overwrite time.
    /// Reads do not change the order.
    #[default]
    OldestWrite,
    /// Evict the least recently used entry. Successful reads move the entry
    /// to the back of the eviction queue; its TTL clock is left alone.
    LeastRecentlyUsed,
}

// == Cache Config ==
/// Construction-time parameters of a single cache instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheConfig {
    /// TTL used when `set` is called without one
    pub ttl: Duration,
    /// Maximum number of stored entries
    pub max_size: usize,
    /// Eviction order once `max_size` is reached
    pub eviction: EvictionPolicy,
}

impl CacheConfig {
    pub fn new(ttl: Duration, max_size: usize) -> Self {
        Self {
            ttl,
            max_size,
            eviction: EvictionPolicy::default(),
        }
    }

    /// Profile for API responses: 5 minutes, 50 entries.
    pub fn api() -> Self {
        Self::new(5 * MINUTE, 50)
    }

    /// Profile for UI state: 30 minutes, 20 entries.
    pub fn ui() -> Self {
        Self::new(30 * MINUTE, 20)
    }

    /// Profile for session-scoped data: 24 hours, 10 entries.
    pub fn session() -> Self {
        Self::new(24 * 60 * MINUTE, 10)
    }

    pub fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = eviction;
        self
    }

    /// Rejects a zero capacity or a zero default TTL.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be greater than zero".to_string(),
            ));
        }
        if self.ttl.is_zero() {
            return Err(CacheError::InvalidTtl(
                "default ttl must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Overrides TTL and capacity from `<PREFIX>_TTL` (seconds) and
    /// `<PREFIX>_MAX_SIZE`, keeping `self` for anything missing or unparsable.
    fn override_from_env(self, prefix: &str) -> Self {
        let ttl = env::var(format!("{prefix}_TTL"))
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(self.ttl);
        let max_size = env::var(format!("{prefix}_MAX_SIZE"))
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.max_size);

        Self {
            ttl,
            max_size,
            ..self
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_MAX_SIZE)
    }
}

// == Config ==
/// Profiles of the three application caches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub api: CacheConfig,
    pub ui: CacheConfig,
    pub session: CacheConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_CACHE_TTL` / `API_CACHE_MAX_SIZE` (default: 300s / 50)
    /// - `UI_CACHE_TTL` / `UI_CACHE_MAX_SIZE` (default: 1800s / 20)
    /// - `SESSION_CACHE_TTL` / `SESSION_CACHE_MAX_SIZE` (default: 86400s / 10)
    pub fn from_env() -> Self {
        Self {
            api: CacheConfig::api().override_from_env("API_CACHE"),
            ui: CacheConfig::ui().override_from_env("UI_CACHE"),
            session: CacheConfig::session().override_from_env("SESSION_CACHE"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: CacheConfig::api(),
            ui: CacheConfig::ui(),
            session: CacheConfig::session(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_size, 100);
        assert_eq!(config.eviction, EvictionPolicy::OldestWrite);
    }

    #[test]
    fn test_presets() {
        let config = Config::default();
        assert_eq!(config.api, CacheConfig::new(Duration::from_secs(300), 50));
        assert_eq!(config.ui, CacheConfig::new(Duration::from_secs(1800), 20));
        assert_eq!(
            config.session,
            CacheConfig::new(Duration::from_secs(86_400), 10)
        );
    }

    #[test]
    fn test_validate() {
        assert!(CacheConfig::default().validate().is_ok());
        assert!(matches!(
            CacheConfig::new(DEFAULT_TTL, 0).validate(),
            Err(CacheError::InvalidConfig(_))
        ));
        assert!(matches!(
            CacheConfig::new(Duration::ZERO, 10).validate(),
            Err(CacheError::InvalidTtl(_))
        ));
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches these variables to avoid races between tests
        env::remove_var("API_CACHE_TTL");
        env::remove_var("API_CACHE_MAX_SIZE");
        env::remove_var("UI_CACHE_TTL");
        env::remove_var("UI_CACHE_MAX_SIZE");
        env::remove_var("SESSION_CACHE_TTL");
        env::remove_var("SESSION_CACHE_MAX_SIZE");

        assert_eq!(Config::from_env(), Config::default());

        env::set_var("UI_CACHE_TTL", "90");
        env::set_var("SESSION_CACHE_MAX_SIZE", "not-a-number");
        let config = Config::from_env();
        assert_eq!(config.ui.ttl, Duration::from_secs(90));
        assert_eq!(config.ui.max_size, 20);
        assert_eq!(config.session.max_size, 10);

        env::remove_var("UI_CACHE_TTL");
        env::remove_var("SESSION_CACHE_MAX_SIZE");
    }
}
