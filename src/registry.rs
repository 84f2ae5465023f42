//! Cache Registry
//!
//! The application's three caches, built once at startup and handed to the
//! code that needs them.

use tracing::info;

use crate::cache::CacheService;
use crate::config::{CacheConfig, Config};
use crate::error::Result;

/// Independent caches for API responses, UI state and session data.
#[derive(Debug, Clone)]
pub struct CacheRegistry {
    pub api: CacheService,
    pub ui: CacheService,
    pub session: CacheService,
}

impl CacheRegistry {
    /// Builds one cache per profile in `config`.
    ///
    /// # Errors
    /// Fails if any profile does not validate.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = Self {
            api: build("api", &config.api)?,
            ui: build("ui", &config.ui)?,
            session: build("session", &config.session)?,
        };
        Ok(registry)
    }

    /// Empties all three caches.
    pub fn clear_all(&self) {
        self.api.clear();
        self.ui.clear();
        self.session.clear();
    }
}

fn build(name: &str, config: &CacheConfig) -> Result<CacheService> {
    let cache = CacheService::new(config.clone())?;
    info!(
        "Cache '{}' initialized: ttl={}s, max_size={}, eviction={:?}",
        name,
        config.ttl.as_secs(),
        config.max_size,
        config.eviction
    );
    Ok(cache)
}
