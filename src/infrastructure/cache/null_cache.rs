//! No-op cache implementation for disabled caching.

use std::time::Duration;

use super::service::{CacheLookup, ResolutionCache};
use crate::domain::entities::UrlMapping;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that stores nothing.
///
/// Used when `CACHE_ENABLED=false`. Every read is a miss, so each resolve
/// goes to the mapping store.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResolutionCache for NullCache {
    async fn get(&self, _short_code: &str) -> CacheLookup {
        CacheLookup::Miss
    }

    async fn set(&self, _short_code: &str, _mapping: &UrlMapping, _ttl: Option<Duration>) {}

    async fn invalidate(&self, _short_code: &str) {}

    async fn health_check(&self) -> bool {
        true
    }
}
