#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use linkshrink::application::services::{ShortenerService, ShortenerSettings};
use linkshrink::domain::entities::UrlMapping;
use linkshrink::domain::hit_event::HitEvent;
use linkshrink::domain::repositories::{MappingStore, StoreError};
use linkshrink::infrastructure::cache::{CacheLookup, MemoryCache, ResolutionCache};
use linkshrink::infrastructure::counter::MemoryCounter;
use linkshrink::infrastructure::persistence::MemoryMappingStore;
use linkshrink::state::AppState;

pub const BASE_URL: &str = "https://sho.rt";

pub fn test_settings(cache_ttl: Duration) -> ShortenerSettings {
    ShortenerSettings {
        cache_ttl,
        allocator_max_retries: 2,
        allocator_retry_base: Duration::from_millis(1),
    }
}

/// In-memory service wired to the given store and cache.
pub fn create_test_service(
    store: Arc<dyn MappingStore>,
    cache: Arc<dyn ResolutionCache>,
    cache_ttl: Duration,
) -> (ShortenerService, mpsc::Receiver<HitEvent>) {
    let (tx, rx) = mpsc::channel(1_000);

    let service = ShortenerService::new(
        Arc::new(MemoryCounter::new()),
        store,
        cache,
        tx,
        test_settings(cache_ttl),
    );

    (service, rx)
}

pub struct TestBackends {
    pub store: Arc<MemoryMappingStore>,
    pub cache: Arc<MemoryCache>,
}

pub fn memory_backends() -> TestBackends {
    TestBackends {
        store: Arc::new(MemoryMappingStore::new()),
        cache: Arc::new(MemoryCache::new(Duration::from_secs(60))),
    }
}

pub fn create_test_state() -> (AppState, TestBackends, mpsc::Receiver<HitEvent>) {
    let backends = memory_backends();
    let (service, rx) = create_test_service(
        backends.store.clone(),
        backends.cache.clone(),
        Duration::from_secs(60),
    );

    (AppState::new(Arc::new(service), BASE_URL), backends, rx)
}

pub fn create_test_state_with(
    store: Arc<dyn MappingStore>,
    cache: Arc<dyn ResolutionCache>,
) -> (AppState, mpsc::Receiver<HitEvent>) {
    let (service, rx) = create_test_service(store, cache, Duration::from_secs(60));

    (AppState::new(Arc::new(service), BASE_URL), rx)
}

/// Cache whose backend is permanently unreachable.
pub struct DownCache;

#[async_trait]
impl ResolutionCache for DownCache {
    async fn get(&self, _short_code: &str) -> CacheLookup {
        CacheLookup::Unavailable
    }

    async fn set(&self, _short_code: &str, _mapping: &UrlMapping, _ttl: Option<Duration>) {}

    async fn invalidate(&self, _short_code: &str) {}

    async fn health_check(&self) -> bool {
        false
    }
}

/// Store whose backend is permanently unreachable.
pub struct DownStore;

#[async_trait]
impl MappingStore for DownStore {
    async fn put(&self, _mapping: &UrlMapping) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn get(&self, _short_code: &str) -> Result<Option<UrlMapping>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _short_code: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn increment_hit_count(&self, _short_code: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}
