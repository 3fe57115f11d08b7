//! Short link creation, resolution and deletion.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::entities::UrlMapping;
use crate::domain::error::ShortenerError;
use crate::domain::hit_event::HitEvent;
use crate::domain::repositories::{AllocatorError, IdAllocator, MappingStore};
use crate::infrastructure::cache::{CacheLookup, ResolutionCache};
use crate::utils::code_encoder::{decode, encode, is_reserved};
use crate::utils::url_normalizer::normalize_url;

/// Upper bound on a single allocator backoff delay.
const MAX_ALLOCATOR_BACKOFF: Duration = Duration::from_secs(2);

/// Tunables for [`ShortenerService`].
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    /// Longest time a cached mapping may outlive a deletion elsewhere.
    pub cache_ttl: Duration,
    /// Allocation retries after the first failed attempt.
    pub allocator_max_retries: usize,
    /// Backoff unit; the n-th retry waits up to `2^n` units (jittered).
    pub allocator_retry_base: Duration,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            allocator_max_retries: 3,
            allocator_retry_base: Duration::from_millis(50),
        }
    }
}

/// Reachability of each backend, as reported by [`ShortenerService::health`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHealth {
    pub store: bool,
    pub allocator: bool,
    pub cache: bool,
    pub hit_queue_open: bool,
    pub hit_queue_capacity: usize,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        self.store && self.allocator && self.cache && self.hit_queue_open
    }
}

/// Orchestrates the allocator, code encoder, mapping store and cache.
///
/// The service holds no locks and no counter state. Uniqueness of short codes
/// follows from the allocator; the store is the source of truth and the cache
/// is consulted first but never required.
pub struct ShortenerService {
    allocator: Arc<dyn IdAllocator>,
    store: Arc<dyn MappingStore>,
    cache: Arc<dyn ResolutionCache>,
    hit_sender: mpsc::Sender<HitEvent>,
    settings: ShortenerSettings,
}

impl ShortenerService {
    /// Creates a new shortener service.
    pub fn new(
        allocator: Arc<dyn IdAllocator>,
        store: Arc<dyn MappingStore>,
        cache: Arc<dyn ResolutionCache>,
        hit_sender: mpsc::Sender<HitEvent>,
        settings: ShortenerSettings,
    ) -> Self {
        Self {
            allocator,
            store,
            cache,
            hit_sender,
            settings,
        }
    }

    /// Creates a short link for `original_url`.
    ///
    /// Every call allocates a new identifier, so shortening the same URL twice
    /// yields two codes. If the store write fails the identifier is burned;
    /// identifiers need not be contiguous. Identifiers whose code is reserved
    /// by a fixed route are skipped.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::InvalidUrl`] if the URL is not an absolute http(s) URL
    /// - [`ShortenerError::InvalidExpiry`] if `expires_at` is not in the future
    /// - [`ShortenerError::ServiceUnavailable`] if allocation retries run out
    /// - [`ShortenerError::AllocatorUnavailable`] if the counter misbehaves
    /// - [`ShortenerError::StoreUnavailable`] / [`ShortenerError::DuplicateCode`]
    ///   if the store rejects the write
    pub async fn create(
        &self,
        original_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<UrlMapping, ShortenerError> {
        let original_url = normalize_url(original_url)?;

        let now = Utc::now();
        if expires_at.is_some_and(|e| e <= now) {
            return Err(ShortenerError::InvalidExpiry);
        }

        let (id, short_code) = self.allocate_code().await?;
        let mapping = UrlMapping::new(short_code, original_url, now, expires_at);

        if let Err(e) = self.store.put(&mapping).await {
            warn!("Failed to persist {} (id {} burned): {}", mapping.short_code, id, e);
            return Err(e.into());
        }

        if let Some(ttl) = self.cache_ttl_for(&mapping, now) {
            self.cache.set(&mapping.short_code, &mapping, Some(ttl)).await;
        }

        metrics::counter!("shortener_links_created_total").increment(1);
        info!(short_code = %mapping.short_code, id, "Short link created");

        Ok(mapping)
    }

    /// Resolves a short code to its mapping.
    ///
    /// # Resolution Order
    ///
    /// 1. Cache hit that has not expired: returned directly
    /// 2. Cache hit that has expired: treated as a miss, purge scheduled
    /// 3. Miss or unavailable cache: read the store, then warm the cache
    ///
    /// Each success queues a hit event without waiting on it.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::InvalidCode`] if the code does not decode to a valid id
    /// - [`ShortenerError::NotFound`] if the mapping is absent or expired
    /// - [`ShortenerError::StoreUnavailable`] if the store cannot be read
    pub async fn resolve(&self, short_code: &str) -> Result<UrlMapping, ShortenerError> {
        decode(short_code)?;

        let now = Utc::now();
        let mut purge_scheduled = false;

        match self.cache.get(short_code).await {
            CacheLookup::Hit(mapping) if !mapping.is_expired_at(now) => {
                self.record_hit(short_code);
                metrics::counter!("shortener_resolutions_total", "source" => "cache").increment(1);
                return Ok(mapping);
            }
            CacheLookup::Hit(_) => {
                debug!("Cached mapping {} has expired", short_code);
                self.spawn_purge(short_code);
                purge_scheduled = true;
            }
            CacheLookup::Miss => {}
            CacheLookup::Unavailable => {
                warn!("Cache unavailable, reading {} from store", short_code);
            }
        }

        let Some(mapping) = self.store.get(short_code).await? else {
            metrics::counter!("shortener_not_found_total").increment(1);
            return Err(ShortenerError::NotFound(short_code.to_string()));
        };

        if mapping.is_expired_at(now) {
            if !purge_scheduled {
                self.spawn_purge(short_code);
            }
            metrics::counter!("shortener_not_found_total").increment(1);
            return Err(ShortenerError::NotFound(short_code.to_string()));
        }

        if let Some(ttl) = self.cache_ttl_for(&mapping, now) {
            self.cache.set(short_code, &mapping, Some(ttl)).await;
        }

        self.record_hit(short_code);
        metrics::counter!("shortener_resolutions_total", "source" => "store").increment(1);

        Ok(mapping)
    }

    /// Reads the stored mapping behind a short code, bypassing the cache.
    ///
    /// Unlike [`Self::resolve`] this does not count a hit, and the returned
    /// `hit_count` is the store's. Hits still queued for the worker are not
    /// included yet.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::InvalidCode`] if the code does not decode to a valid id
    /// - [`ShortenerError::NotFound`] if the mapping is absent or expired
    /// - [`ShortenerError::StoreUnavailable`] if the store cannot be read
    pub async fn lookup(&self, short_code: &str) -> Result<UrlMapping, ShortenerError> {
        decode(short_code)?;

        match self.store.get(short_code).await? {
            Some(mapping) if !mapping.is_expired_at(Utc::now()) => Ok(mapping),
            Some(_) => {
                self.spawn_purge(short_code);
                Err(ShortenerError::NotFound(short_code.to_string()))
            }
            None => Err(ShortenerError::NotFound(short_code.to_string())),
        }
    }

    /// Deletes a short link. Idempotent.
    ///
    /// Codes that do not decode can never have been allocated, so they are
    /// accepted without touching the store.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenerError::StoreUnavailable`] if the store delete fails.
    pub async fn delete(&self, short_code: &str) -> Result<(), ShortenerError> {
        if let Err(e) = decode(short_code) {
            debug!("Delete of undecodable code {:?} ignored: {}", short_code, e);
            return Ok(());
        }

        self.store.delete(short_code).await?;
        self.cache.invalidate(short_code).await;

        metrics::counter!("shortener_links_deleted_total").increment(1);
        info!(short_code, "Short link deleted");

        Ok(())
    }

    /// Probes every backend concurrently.
    pub async fn health(&self) -> ServiceHealth {
        let (store, allocator, cache) = tokio::join!(
            self.store.health_check(),
            self.allocator.health_check(),
            self.cache.health_check(),
        );

        ServiceHealth {
            store,
            allocator,
            cache,
            hit_queue_open: !self.hit_sender.is_closed(),
            hit_queue_capacity: self.hit_sender.capacity(),
        }
    }

    /// Allocates an identifier and its code, skipping reserved codes.
    async fn allocate_code(&self) -> Result<(u64, String), ShortenerError> {
        loop {
            let id = self.allocate_id().await?;
            let short_code = encode(id);
            if !is_reserved(&short_code) {
                return Ok((id, short_code));
            }
            debug!("Skipping reserved code {} (id {})", short_code, id);
        }
    }

    /// Allocates an identifier, retrying transient failures with jittered
    /// exponential backoff.
    async fn allocate_id(&self) -> Result<u64, ShortenerError> {
        let retries = self.settings.allocator_max_retries;
        let unit = u64::try_from(self.settings.allocator_retry_base.as_millis())
            .unwrap_or(u64::MAX)
            .max(1);

        let strategy = ExponentialBackoff::from_millis(2)
            .factor(unit)
            .max_delay(MAX_ALLOCATOR_BACKOFF)
            .map(jitter)
            .take(retries);

        RetryIf::spawn(
            strategy,
            || self.allocator.next_id(),
            |e: &AllocatorError| {
                if e.is_transient() {
                    warn!("Identifier allocation failed, retrying: {}", e);
                }
                e.is_transient()
            },
        )
        .await
        .map_err(|e| {
            if e.is_transient() {
                warn!("Identifier allocation gave up after {} attempts: {}", retries + 1, e);
                ShortenerError::ServiceUnavailable {
                    attempts: retries + 1,
                }
            } else {
                e.into()
            }
        })
    }

    /// TTL for caching `mapping`: the configured TTL, shortened to the
    /// mapping's remaining lifetime. `None` if it must not be cached.
    fn cache_ttl_for(&self, mapping: &UrlMapping, now: DateTime<Utc>) -> Option<Duration> {
        match mapping.expires_at {
            None => Some(self.settings.cache_ttl),
            Some(expires_at) => (expires_at - now)
                .to_std()
                .ok()
                .filter(|remaining| !remaining.is_zero())
                .map(|remaining| remaining.min(self.settings.cache_ttl)),
        }
    }

    fn record_hit(&self, short_code: &str) {
        if let Err(e) = self.hit_sender.try_send(HitEvent::new(short_code)) {
            debug!("Hit for {} dropped: {}", short_code, e);
        }
    }

    /// Removes an expired mapping from the store and cache in the background.
    fn spawn_purge(&self, short_code: &str) {
        let store = self.store.clone();
        let cache = self.cache.clone();
        let short_code = short_code.to_string();

        tokio::spawn(async move {
            cache.invalidate(&short_code).await;
            match store.delete(&short_code).await {
                Ok(()) => debug!("Purged expired mapping {}", short_code),
                Err(e) => warn!("Failed to purge expired mapping {}: {}", short_code, e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockIdAllocator, MockMappingStore, StoreError};
    use crate::infrastructure::cache::MockResolutionCache;
    use chrono::Duration as ChronoDuration;

    fn test_settings() -> ShortenerSettings {
        ShortenerSettings {
            cache_ttl: Duration::from_secs(60),
            allocator_max_retries: 2,
            allocator_retry_base: Duration::from_millis(1),
        }
    }

    fn build(
        allocator: MockIdAllocator,
        store: MockMappingStore,
        cache: MockResolutionCache,
    ) -> (ShortenerService, mpsc::Receiver<HitEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let service = ShortenerService::new(
            Arc::new(allocator),
            Arc::new(store),
            Arc::new(cache),
            tx,
            test_settings(),
        );
        (service, rx)
    }

    fn create_test_mapping(code: &str, expires_at: Option<DateTime<Utc>>) -> UrlMapping {
        UrlMapping::new(
            code.to_string(),
            "https://example.com/a".to_string(),
            Utc::now() - ChronoDuration::minutes(5),
            expires_at,
        )
    }

    #[tokio::test]
    async fn test_create_success_persists_and_warms_cache() {
        let mut allocator = MockIdAllocator::new();
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        allocator.expect_next_id().times(1).returning(|| Ok(125));
        store
            .expect_put()
            .withf(|m| m.short_code == "21" && m.original_url == "https://example.com/a")
            .times(1)
            .returning(|_| Ok(()));
        cache
            .expect_set()
            .withf(|code, _, ttl| code == "21" && *ttl == Some(Duration::from_secs(60)))
            .times(1)
            .returning(|_, _, _| ());

        let (service, _rx) = build(allocator, store, cache);

        let mapping = service.create("https://example.com/a", None).await.unwrap();

        assert_eq!(mapping.short_code, "21");
        assert_eq!(mapping.original_url, "https://example.com/a");
        assert_eq!(mapping.hit_count, 0);
        assert!(mapping.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_create_invalid_url_allocates_nothing() {
        let mut allocator = MockIdAllocator::new();
        allocator.expect_next_id().times(0);

        let (service, _rx) = build(allocator, MockMappingStore::new(), MockResolutionCache::new());

        let result = service.create("not a url", None).await;

        assert!(matches!(result, Err(ShortenerError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_create_past_expiry_rejected() {
        let (service, _rx) = build(
            MockIdAllocator::new(),
            MockMappingStore::new(),
            MockResolutionCache::new(),
        );

        let result = service
            .create(
                "https://example.com/a",
                Some(Utc::now() - ChronoDuration::seconds(1)),
            )
            .await;

        assert!(matches!(result, Err(ShortenerError::InvalidExpiry)));
    }

    #[tokio::test]
    async fn test_create_with_expiry_caps_cache_ttl() {
        let mut allocator = MockIdAllocator::new();
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        allocator.expect_next_id().returning(|| Ok(1));
        store.expect_put().returning(|_| Ok(()));
        cache
            .expect_set()
            .withf(|_, _, ttl| ttl.is_some_and(|t| t <= Duration::from_secs(10)))
            .times(1)
            .returning(|_, _, _| ());

        let (service, _rx) = build(allocator, store, cache);

        let expires_at = Utc::now() + ChronoDuration::seconds(10);
        let mapping = service
            .create("https://example.com/a", Some(expires_at))
            .await
            .unwrap();

        assert_eq!(mapping.expires_at, Some(expires_at));
    }

    #[tokio::test]
    async fn test_create_retries_transient_allocator_failures() {
        let mut allocator = MockIdAllocator::new();
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        let mut calls = 0;
        allocator.expect_next_id().times(3).returning(move || {
            calls += 1;
            if calls < 3 {
                Err(AllocatorError::Unavailable("connection refused".to_string()))
            } else {
                Ok(62)
            }
        });
        store.expect_put().times(1).returning(|_| Ok(()));
        cache.expect_set().returning(|_, _, _| ());

        let (service, _rx) = build(allocator, store, cache);

        let mapping = service.create("https://example.com/a", None).await.unwrap();

        assert_eq!(mapping.short_code, "10");
    }

    #[tokio::test]
    async fn test_create_gives_up_after_max_retries() {
        let mut allocator = MockIdAllocator::new();
        let mut store = MockMappingStore::new();

        allocator
            .expect_next_id()
            .times(3)
            .returning(|| Err(AllocatorError::Unavailable("down".to_string())));
        store.expect_put().times(0);

        let (service, _rx) = build(allocator, store, MockResolutionCache::new());

        let result = service.create("https://example.com/a", None).await;

        assert!(matches!(
            result,
            Err(ShortenerError::ServiceUnavailable { attempts: 3 })
        ));
    }

    #[tokio::test]
    async fn test_create_does_not_retry_invalid_counter_value() {
        let mut allocator = MockIdAllocator::new();
        allocator
            .expect_next_id()
            .times(1)
            .returning(|| Err(AllocatorError::InvalidValue(0)));

        let (service, _rx) = build(allocator, MockMappingStore::new(), MockResolutionCache::new());

        let result = service.create("https://example.com/a", None).await;

        assert!(matches!(
            result,
            Err(ShortenerError::AllocatorUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_create_does_not_retry_exhausted_counter() {
        let mut allocator = MockIdAllocator::new();
        allocator
            .expect_next_id()
            .times(1)
            .returning(|| Err(AllocatorError::Exhausted));

        let (service, _rx) = build(allocator, MockMappingStore::new(), MockResolutionCache::new());

        let result = service.create("https://example.com/a", None).await;

        assert!(matches!(
            result,
            Err(ShortenerError::AllocatorUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_create_skips_reserved_code() {
        let reserved = decode("health").unwrap();
        let expected = encode(reserved + 1);

        let mut allocator = MockIdAllocator::new();
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        let mut next = reserved;
        allocator.expect_next_id().times(2).returning(move || {
            let id = next;
            next += 1;
            Ok(id)
        });
        let stored_code = expected.clone();
        store
            .expect_put()
            .times(1)
            .withf(move |m| m.short_code == stored_code)
            .returning(|_| Ok(()));
        cache.expect_set().times(1).returning(|_, _, _| ());

        let (service, _rx) = build(allocator, store, cache);

        let created = service.create("https://example.com/a", None).await.unwrap();

        assert_eq!(created.short_code, expected);
    }

    #[tokio::test]
    async fn test_lookup_reads_store_not_cache() {
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        let mut stored = create_test_mapping("21", None);
        stored.hit_count = 7;
        store
            .expect_get()
            .times(1)
            .withf(|code| code == "21")
            .returning(move |_| Ok(Some(stored.clone())));
        cache.expect_get().times(0);

        let (service, mut rx) = build(MockIdAllocator::new(), store, cache);

        let mapping = service.lookup("21").await.unwrap();

        assert_eq!(mapping.hit_count, 7);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_lookup_unknown_code_not_found() {
        let mut store = MockMappingStore::new();
        store.expect_get().returning(|_| Ok(None));

        let (service, _rx) = build(MockIdAllocator::new(), store, MockResolutionCache::new());

        let result = service.lookup("21").await;

        assert!(matches!(result, Err(ShortenerError::NotFound(code)) if code == "21"));
    }

    #[tokio::test]
    async fn test_create_store_failure_surfaces_and_skips_cache() {
        let mut allocator = MockIdAllocator::new();
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        allocator.expect_next_id().times(1).returning(|| Ok(5));
        store
            .expect_put()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("pool timed out".to_string())));
        cache.expect_set().times(0);

        let (service, _rx) = build(allocator, store, cache);

        let result = service.create("https://example.com/a", None).await;

        assert!(matches!(result, Err(ShortenerError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_resolve_cache_hit_skips_store() {
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        let cached = create_test_mapping("21", None);
        cache
            .expect_get()
            .times(1)
            .returning(move |_| CacheLookup::Hit(cached.clone()));
        store.expect_get().times(0);

        let (service, mut rx) = build(MockIdAllocator::new(), store, cache);

        let mapping = service.resolve("21").await.unwrap();

        assert_eq!(mapping.original_url, "https://example.com/a");
        assert_eq!(rx.try_recv().unwrap(), HitEvent::new("21"));
    }

    #[tokio::test]
    async fn test_resolve_cache_miss_reads_store_and_warms_cache() {
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        cache.expect_get().times(1).returning(|_| CacheLookup::Miss);
        let stored = create_test_mapping("21", None);
        store
            .expect_get()
            .withf(|code| code == "21")
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        cache
            .expect_set()
            .withf(|code, m, _| code == "21" && m.short_code == "21")
            .times(1)
            .returning(|_, _, _| ());

        let (service, mut rx) = build(MockIdAllocator::new(), store, cache);

        let mapping = service.resolve("21").await.unwrap();

        assert_eq!(mapping.original_url, "https://example.com/a");
        assert_eq!(rx.try_recv().unwrap(), HitEvent::new("21"));
    }

    #[tokio::test]
    async fn test_resolve_cache_unavailable_falls_back_to_store() {
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        cache
            .expect_get()
            .times(1)
            .returning(|_| CacheLookup::Unavailable);
        let stored = create_test_mapping("21", None);
        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        cache.expect_set().returning(|_, _, _| ());

        let (service, _rx) = build(MockIdAllocator::new(), store, cache);

        let mapping = service.resolve("21").await.unwrap();

        assert_eq!(mapping.original_url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_not_found() {
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        cache.expect_get().returning(|_| CacheLookup::Miss);
        store.expect_get().times(1).returning(|_| Ok(None));
        cache.expect_set().times(0);

        let (service, mut rx) = build(MockIdAllocator::new(), store, cache);

        let result = service.resolve("21").await;

        assert!(matches!(result, Err(ShortenerError::NotFound(code)) if code == "21"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_expired_cache_entry_is_not_returned() {
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        let expired = create_test_mapping("21", Some(Utc::now() - ChronoDuration::seconds(1)));
        let stored = expired.clone();
        cache
            .expect_get()
            .times(1)
            .returning(move |_| CacheLookup::Hit(expired.clone()));
        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        cache.expect_set().times(0);
        // Background purge
        cache.expect_invalidate().returning(|_| ());
        store.expect_delete().returning(|_| Ok(()));

        let (service, mut rx) = build(MockIdAllocator::new(), store, cache);

        let result = service.resolve("21").await;

        assert!(matches!(result, Err(ShortenerError::NotFound(_))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_expired_store_entry_not_found() {
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        cache.expect_get().returning(|_| CacheLookup::Miss);
        let expired = create_test_mapping("21", Some(Utc::now() - ChronoDuration::seconds(1)));
        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(expired.clone())));
        cache.expect_set().times(0);
        cache.expect_invalidate().returning(|_| ());
        store.expect_delete().returning(|_| Ok(()));

        let (service, _rx) = build(MockIdAllocator::new(), store, cache);

        assert!(matches!(
            service.resolve("21").await,
            Err(ShortenerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_invalid_code_touches_nothing() {
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();
        cache.expect_get().times(0);
        store.expect_get().times(0);

        let (service, _rx) = build(MockIdAllocator::new(), store, cache);

        assert!(matches!(
            service.resolve("!!!").await,
            Err(ShortenerError::InvalidCode(_))
        ));
        assert!(matches!(
            service.resolve("0").await,
            Err(ShortenerError::InvalidCode(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_store_unavailable_surfaces() {
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        cache.expect_get().returning(|_| CacheLookup::Unavailable);
        store
            .expect_get()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("down".to_string())));

        let (service, _rx) = build(MockIdAllocator::new(), store, cache);

        assert!(matches!(
            service.resolve("21").await,
            Err(ShortenerError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_from_store_and_cache() {
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        store
            .expect_delete()
            .withf(|code| code == "21")
            .times(1)
            .returning(|_| Ok(()));
        cache
            .expect_invalidate()
            .withf(|code| code == "21")
            .times(1)
            .returning(|_| ());

        let (service, _rx) = build(MockIdAllocator::new(), store, cache);

        assert!(service.delete("21").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_store_unavailable_keeps_cache() {
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        store
            .expect_delete()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("down".to_string())));
        cache.expect_invalidate().times(0);

        let (service, _rx) = build(MockIdAllocator::new(), store, cache);

        assert!(matches!(
            service.delete("21").await,
            Err(ShortenerError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_undecodable_code_is_noop_success() {
        let mut store = MockMappingStore::new();
        store.expect_delete().times(0);

        let (service, _rx) = build(MockIdAllocator::new(), store, MockResolutionCache::new());

        assert!(service.delete("!!!").await.is_ok());
    }

    #[tokio::test]
    async fn test_health_reports_each_backend() {
        let mut allocator = MockIdAllocator::new();
        let mut store = MockMappingStore::new();
        let mut cache = MockResolutionCache::new();

        allocator.expect_health_check().returning(|| true);
        store.expect_health_check().returning(|| true);
        cache.expect_health_check().returning(|| false);

        let (service, _rx) = build(allocator, store, cache);

        let health = service.health().await;

        assert!(health.store);
        assert!(health.allocator);
        assert!(!health.cache);
        assert!(health.hit_queue_open);
        assert_eq!(health.hit_queue_capacity, 16);
        assert!(!health.is_healthy());
    }
}
