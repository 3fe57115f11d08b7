//! Process-wide Redis connection shared by the counter and the cache.

use redis::{AsyncCommands, Client, RedisResult, aio::ConnectionManager};
use tracing::info;

/// Connects to Redis and validates the connection with a PING.
///
/// The returned `ConnectionManager` is cheap to clone and reconnects on its
/// own, so callers create it once at startup and share it; there is no
/// per-call "is open" probing.
///
/// # Errors
///
/// Returns the Redis error if the URL is invalid, the connection cannot be
/// established, or the PING fails.
pub async fn connect(redis_url: &str) -> RedisResult<ConnectionManager> {
    info!("Connecting to Redis");

    let client = Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;

    let mut test_conn = manager.clone();
    test_conn.ping::<()>().await?;

    info!("✓ Connected to Redis");

    Ok(manager)
}
