//! Redis-backed resolution cache.

use std::time::Duration;

use super::service::{CacheLookup, ResolutionCache};
use crate::domain::entities::{UrlMapping, mapping_key};
use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use tracing::{debug, error, warn};

/// Redis cache for fast resolutions.
///
/// Entries live under `url:<code>` as JSON-serialized [`UrlMapping`] copies
/// with a `SET EX` expiry. Shares the process-wide `ConnectionManager`
/// created at startup; errors are logged and never reach callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: Duration,
}

impl RedisCache {
    /// Wraps an established connection.
    ///
    /// `default_ttl` applies when [`ResolutionCache::set`] is called with
    /// `ttl = None`; controlled via `CACHE_TTL_SECONDS`.
    pub fn new(client: ConnectionManager, default_ttl: Duration) -> Self {
        Self {
            client,
            default_ttl,
        }
    }
}

/// Whole seconds for `SET EX`, rounded up so sub-second TTLs still expire.
fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs().saturating_add(u64::from(ttl.subsec_nanos() > 0));
    secs.max(1)
}

#[async_trait]
impl ResolutionCache for RedisCache {
    async fn get(&self, short_code: &str) -> CacheLookup {
        let key = mapping_key(short_code);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<UrlMapping>(&raw) {
                Ok(mapping) => {
                    debug!("Cache HIT: {}", short_code);
                    CacheLookup::Hit(mapping)
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry {}: {}", key, e);
                    self.invalidate(short_code).await;
                    CacheLookup::Miss
                }
            },
            Ok(None) => {
                debug!("Cache MISS: {}", short_code);
                CacheLookup::Miss
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", short_code, e);
                CacheLookup::Unavailable
            }
        }
    }

    async fn set(&self, short_code: &str, mapping: &UrlMapping, ttl: Option<Duration>) {
        let value = match serde_json::to_string(mapping) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to serialize mapping {}: {}", short_code, e);
                return;
            }
        };

        let key = mapping_key(short_code);
        let seconds = ttl_seconds(ttl.unwrap_or(self.default_ttl));
        let mut conn = self.client.clone();

        match conn.set_ex::<_, _, ()>(&key, value, seconds).await {
            Ok(()) => debug!("Cache SET: {} (TTL: {}s)", short_code, seconds),
            Err(e) => warn!("Redis SET error for {}: {}", short_code, e),
        }
    }

    async fn invalidate(&self, short_code: &str) {
        let key = mapping_key(short_code);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) if deleted > 0 => debug!("Cache INVALIDATE: {}", short_code),
            Ok(_) => {}
            Err(e) => warn!("Redis DEL error for {}: {}", short_code, e),
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
