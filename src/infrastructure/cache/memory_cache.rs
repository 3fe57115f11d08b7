//! In-process resolution cache for the single-process `memory` backend.

use std::time::{Duration, Instant};

use super::service::{CacheLookup, ResolutionCache};
use crate::domain::entities::UrlMapping;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, warn};

struct Entry {
    mapping: UrlMapping,
    deadline: Instant,
}

/// Concurrent map of cached mappings with per-entry deadlines.
///
/// Expired entries are dropped lazily on read.
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    /// Number of entries currently held, including not yet collected expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ResolutionCache for MemoryCache {
    async fn get(&self, short_code: &str) -> CacheLookup {
        let now = Instant::now();

        // The read guard must be released before `remove` on the same shard
        let cached = self.entries.get(short_code).map(|entry| {
            if entry.deadline > now {
                Some(entry.mapping.clone())
            } else {
                None
            }
        });

        match cached {
            Some(Some(mapping)) => {
                debug!("Cache HIT: {}", short_code);
                CacheLookup::Hit(mapping)
            }
            Some(None) => {
                self.entries
                    .remove_if(short_code, |_, entry| entry.deadline <= now);
                debug!("Cache EXPIRED: {}", short_code);
                CacheLookup::Miss
            }
            None => {
                debug!("Cache MISS: {}", short_code);
                CacheLookup::Miss
            }
        }
    }

    async fn set(&self, short_code: &str, mapping: &UrlMapping, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let Some(deadline) = Instant::now().checked_add(ttl) else {
            warn!("Cache TTL {:?} out of range, not caching {}", ttl, short_code);
            return;
        };

        self.entries.insert(
            short_code.to_string(),
            Entry {
                mapping: mapping.clone(),
                deadline,
            },
        );
    }

    async fn invalidate(&self, short_code: &str) {
        if self.entries.remove(short_code).is_some() {
            debug!("Cache INVALIDATE: {}", short_code);
        }
    }

    async fn health_check(&self) -> bool {
        true
    }
}
