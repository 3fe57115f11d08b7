//! Process-local identifier allocator for the `memory` backend.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::domain::repositories::{AllocatorError, IdAllocator};

/// Atomic counter scoped to one process.
///
/// Only valid when a single process owns the whole mapping space, as with the
/// in-memory store. Never used as a fallback for an unreachable Redis.
#[derive(Debug, Default)]
pub struct MemoryCounter {
    last: AtomicU64,
}

impl MemoryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts allocation after `last`, e.g. to resume from a known value.
    pub fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }
}

#[async_trait]
impl IdAllocator for MemoryCounter {
    async fn next_id(&self) -> Result<u64, AllocatorError> {
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| v.checked_add(1))
            .map_err(|_| AllocatorError::Exhausted)?;
        Ok(previous + 1)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_id_is_one() {
        let counter = MemoryCounter::new();
        assert_eq!(counter.next_id().await.unwrap(), 1);
        assert_eq!(counter.next_id().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_starting_after() {
        let counter = MemoryCounter::starting_after(41);
        assert_eq!(counter.next_id().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_exhausted_counter_fails() {
        let counter = MemoryCounter::starting_after(u64::MAX);

        let err = counter.next_id().await.unwrap_err();

        assert!(matches!(err, AllocatorError::Exhausted));
        assert!(!err.is_transient());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_allocations_are_distinct() {
        let counter = Arc::new(MemoryCounter::new());

        let handles: Vec<_> = (0..1000)
            .map(|_| {
                let counter = counter.clone();
                tokio::spawn(async move { counter.next_id().await.unwrap() })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let id = handle.await.unwrap();
            assert_ne!(id, 0);
            ids.insert(id);
        }

        assert_eq!(ids.len(), 1000);
    }
}
