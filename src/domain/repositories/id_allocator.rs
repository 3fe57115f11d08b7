//! Allocator trait for unique short-code identifiers.

use async_trait::async_trait;

/// Errors returned by an [`IdAllocator`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum AllocatorError {
    /// The backing counter could not be reached. Safe to retry.
    #[error("counter backend unavailable: {0}")]
    Unavailable(String),

    /// The backing counter returned a value that is not a valid identifier.
    #[error("counter returned invalid value {0}")]
    InvalidValue(i64),

    /// The identifier space is used up. Retrying cannot help.
    #[error("counter exhausted")]
    Exhausted,
}

impl AllocatorError {
    /// Returns true if the caller may retry the allocation.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Source of globally unique, strictly increasing identifiers.
///
/// Uniqueness comes from the backing store's atomic increment; implementations
/// hold no counter state of their own that could diverge between processes.
///
/// # Implementations
///
/// - [`crate::infrastructure::counter::RedisCounter`] - Redis `INCR`
/// - [`crate::infrastructure::counter::MemoryCounter`] - single-process atomic
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdAllocator: Send + Sync {
    /// Returns the next identifier. Never returns 0.
    ///
    /// # Errors
    ///
    /// Returns [`AllocatorError::Unavailable`] if the backend is unreachable.
    /// Fails fast; retry policy belongs to the caller.
    async fn next_id(&self) -> Result<u64, AllocatorError>;

    /// Checks if the counter backend is reachable.
    async fn health_check(&self) -> bool;
}
