//! Redis `INCR`-backed identifier allocator.

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use tracing::{debug, error};

use crate::domain::repositories::{AllocatorError, IdAllocator};

/// Allocates identifiers with an atomic `INCR` on a single shared key.
///
/// Redis serializes increments, so concurrent callers in any number of
/// processes never observe the same value. The key lives outside the `url:`
/// namespace used for mappings.
pub struct RedisCounter {
    client: ConnectionManager,
    key: String,
}

impl RedisCounter {
    pub fn new(client: ConnectionManager, key: impl Into<String>) -> Self {
        Self {
            client,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Converts a raw `INCR` reply into an identifier.
fn to_identifier(value: i64) -> Result<u64, AllocatorError> {
    u64::try_from(value)
        .ok()
        .filter(|id| *id > 0)
        .ok_or(AllocatorError::InvalidValue(value))
}

#[async_trait]
impl IdAllocator for RedisCounter {
    async fn next_id(&self) -> Result<u64, AllocatorError> {
        let mut conn = self.client.clone();

        let value: i64 = conn.incr(&self.key, 1).await.map_err(|e| {
            error!("Redis INCR error on {}: {}", self.key, e);
            AllocatorError::Unavailable(e.to_string())
        })?;

        debug!("Allocated id {} from {}", value, self.key);
        to_identifier(value)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
