//! HTTP server initialization and runtime setup.
//!
//! Handles backend connections, worker spawning, and Axum server lifecycle.

use crate::application::services::ShortenerService;
use crate::config::{Config, StorageBackend};
use crate::domain::hit_worker::run_hit_worker;
use crate::domain::repositories::{IdAllocator, MappingStore};
use crate::infrastructure::cache::{MemoryCache, NullCache, RedisCache, ResolutionCache};
use crate::infrastructure::counter::{MemoryCounter, RedisCounter};
use crate::infrastructure::persistence::{MemoryMappingStore, PgMappingStore};
use crate::infrastructure::redis_connection;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Concrete backends selected by [`StorageBackend`].
pub struct Backends {
    pub allocator: Arc<dyn IdAllocator>,
    pub store: Arc<dyn MappingStore>,
    pub cache: Arc<dyn ResolutionCache>,
}

/// Connects the counter, store and cache for the configured backend.
///
/// For `postgres` this opens the connection pool, applies pending migrations
/// and opens one Redis connection shared by the counter and the cache.
///
/// # Errors
///
/// Returns an error if a required URL is missing, a connection fails or
/// migrations cannot be applied.
pub async fn connect_backends(config: &Config) -> Result<Backends> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory backend: single process only, nothing is persisted");

            let cache: Arc<dyn ResolutionCache> = if config.is_cache_enabled() {
                tracing::info!("Cache enabled (in-memory)");
                Arc::new(MemoryCache::new(config.cache_ttl()))
            } else {
                tracing::info!("Cache disabled (NullCache)");
                Arc::new(NullCache::new())
            };

            Ok(Backends {
                allocator: Arc::new(MemoryCounter::new()),
                store: Arc::new(MemoryMappingStore::new()),
                cache,
            })
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let redis_url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is required for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
                .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to apply migrations")?;

            let redis = redis_connection::connect(redis_url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Connected to Redis");

            let cache: Arc<dyn ResolutionCache> = if config.is_cache_enabled() {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(RedisCache::new(redis.clone(), config.cache_ttl()))
            } else {
                tracing::info!("Cache disabled (NullCache)");
                Arc::new(NullCache::new())
            };

            Ok(Backends {
                allocator: Arc::new(RedisCounter::new(redis, &config.redis_counter_key)),
                store: Arc::new(PgMappingStore::new(Arc::new(pool))),
                cache,
            })
        }
    }
}

/// Builds the shortener service and spawns its hit worker.
///
/// The worker exits once the returned service (and every clone of its
/// sender) is dropped, after draining queued events.
pub fn build_shortener(config: &Config, backends: Backends) -> (ShortenerService, JoinHandle<()>) {
    let (hit_tx, hit_rx) = mpsc::channel(config.hit_queue_capacity);

    let worker = tokio::spawn(run_hit_worker(hit_rx, backends.store.clone()));
    tracing::info!("Hit worker started");

    let service = ShortenerService::new(
        backends.allocator,
        backends.store,
        backends.cache,
        hit_tx,
        config.shortener_settings(),
    );

    (service, worker)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Counter, mapping store and cache for the configured backend
/// - Background hit worker
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - A backend connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let backends = connect_backends(&config).await?;
    let (shortener, hit_worker) = build_shortener(&config, backends);

    let state = AppState::new(Arc::new(shortener), config.base_url.clone());
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it the last hit sender) is gone; let the worker drain
    tracing::info!("Server stopped, draining hit queue");
    if let Err(e) = hit_worker.await {
        tracing::error!("Hit worker terminated abnormally: {}", e);
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
