//! Memoization Module
//!
//! Wraps a function so that calls deriving the same key reuse a cached
//! result. The wrapped function returns a [`Computation`], which is either a
//! value that is already available or a future still to be awaited; the
//! wrapper picks its caching path from whichever shape comes back.
//!
//! There is no de-duplication of calls in flight: two calls that miss the
//! cache before either has resolved both run the function, and the one that
//! resolves last leaves its value in the cache.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, warn};

use crate::cache::CacheService;
use crate::error::{CacheError, Result};

// == Computation ==
/// Result of a function that may or may not finish synchronously.
pub enum Computation<V, E> {
    /// Finished, successfully or not
    Ready(std::result::Result<V, E>),
    /// Still running
    Pending(BoxFuture<'static, std::result::Result<V, E>>),
}

impl<V, E> Computation<V, E> {
    pub fn ready(value: V) -> Self {
        Self::Ready(Ok(value))
    }

    pub fn failed(error: E) -> Self {
        Self::Ready(Err(error))
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = std::result::Result<V, E>> + Send + 'static,
    {
        Self::Pending(future.boxed())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Waits for the outcome, whichever shape the computation has.
    pub async fn resolve(self) -> std::result::Result<V, E> {
        match self {
            Self::Ready(result) => result,
            Self::Pending(future) => future.await,
        }
    }
}

impl<V, E> From<std::result::Result<V, E>> for Computation<V, E> {
    fn from(result: std::result::Result<V, E>) -> Self {
        Self::Ready(result)
    }
}

impl<V: fmt::Debug, E: fmt::Debug> fmt::Debug for Computation<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

// == With Cache ==
/// Prepares memoization through `cache`, keyed by `key_fn` and stored with
/// `ttl` (the cache default when None).
///
/// # Errors
/// `InvalidTtl` if `ttl` is zero.
pub fn with_cache<K>(
    cache: &CacheService,
    key_fn: K,
    ttl: Option<Duration>,
) -> Result<Memoizer<K>> {
    if ttl.is_some_and(|ttl| ttl.is_zero()) {
        return Err(CacheError::InvalidTtl(
            "memoization ttl must be greater than zero".to_string(),
        ));
    }

    Ok(Memoizer {
        cache: cache.clone(),
        key_fn,
        ttl,
    })
}

/// Cache, key derivation and TTL waiting for a function to wrap.
pub struct Memoizer<K> {
    cache: CacheService,
    key_fn: K,
    ttl: Option<Duration>,
}

impl<K> Memoizer<K> {
    pub fn wrap<F>(self, func: F) -> Memoized<K, F> {
        Memoized {
            cache: self.cache,
            key_fn: self.key_fn,
            ttl: self.ttl,
            func,
        }
    }
}

// == Memoized ==
/// A function whose successful results are cached.
pub struct Memoized<K, F> {
    cache: CacheService,
    key_fn: K,
    ttl: Option<Duration>,
    func: F,
}

impl<K, F> Memoized<K, F> {
    /// Returns the cached result for the key derived from `args`, or runs
    /// the wrapped function.
    ///
    /// A ready success is cached before returning. A pending computation is
    /// returned as a pending computation that caches the value once it
    /// resolves. Failures are passed through and never cached.
    pub fn call<A, V, E>(&self, args: A) -> Computation<Arc<V>, E>
    where
        K: Fn(&A) -> String,
        F: Fn(A) -> Computation<V, E>,
        V: Any + Send + Sync,
        E: Send + 'static,
    {
        let key = (self.key_fn)(&args);
        if let Some(cached) = self.cache.get::<V>(&key) {
            debug!("Memoized call hit for '{}'", key);
            return Computation::ready(cached);
        }
        debug!("Memoized call miss for '{}'", key);

        match (self.func)(args) {
            Computation::Ready(Ok(value)) => {
                Computation::ready(store(&self.cache, key, Arc::new(value), self.ttl))
            }
            Computation::Ready(Err(error)) => Computation::failed(error),
            Computation::Pending(future) => {
                let cache = self.cache.clone();
                let ttl = self.ttl;
                Computation::pending(async move {
                    let value = Arc::new(future.await?);
                    Ok(store(&cache, key, value, ttl))
                })
            }
        }
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }
}

/// Caches `value`, logging instead of failing if the cache refuses the key.
fn store<V>(cache: &CacheService, key: String, value: Arc<V>, ttl: Option<Duration>) -> Arc<V>
where
    V: Any + Send + Sync,
{
    if let Err(err) = cache.set_shared(key.as_str(), Arc::clone(&value), ttl) {
        warn!("Memoized result for '{}' was not cached: {}", key, err);
    }
    value
}
