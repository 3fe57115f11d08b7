//! Resolution cache trait and lookup result.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::UrlMapping;

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// A cached copy of the mapping.
    Hit(UrlMapping),
    /// Nothing cached for this code.
    Miss,
    /// The backend could not answer; fall through to the store.
    Unavailable,
}

/// Fast-path cache of short code → mapping fronting the mapping store.
///
/// The cache is an optimization only. Implementations must never fail the
/// surrounding operation: reads report [`CacheLookup::Unavailable`], writes
/// and invalidations log and return.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis with per-entry TTL
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process map with deadlines
/// - [`crate::infrastructure::cache::NullCache`] - caching disabled
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResolutionCache: Send + Sync {
    /// Looks up the cached mapping for a short code.
    async fn get(&self, short_code: &str) -> CacheLookup;

    /// Caches a copy of `mapping`.
    ///
    /// `ttl` of `None` uses the implementation's default time-to-live. The TTL
    /// bounds how long a deletion elsewhere can go unnoticed.
    async fn set(&self, short_code: &str, mapping: &UrlMapping, ttl: Option<Duration>);

    /// Removes a cached mapping, if any.
    async fn invalidate(&self, short_code: &str);

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
