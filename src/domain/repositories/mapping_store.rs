//! Store trait for durable short code → URL mappings.

use crate::domain::entities::UrlMapping;
use async_trait::async_trait;

/// Errors returned by a [`MappingStore`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("short code already exists: {0}")]
    DuplicateCode(String),

    #[error("mapping store unavailable: {0}")]
    Unavailable(String),
}

/// Source of truth for URL mappings.
///
/// Writes are independent per short code. A `get` issued after a successful
/// `put` for the same code observes the written mapping.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingStore`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryMappingStore`] - in-process map
///
/// # Examples
///
/// See integration tests: `tests/repository_mapping.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Persists a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateCode`] if the short code is already stored.
    /// Returns [`StoreError::Unavailable`] on backend errors.
    async fn put(&self, mapping: &UrlMapping) -> Result<(), StoreError>;

    /// Loads a mapping by short code.
    ///
    /// Expired mappings are returned as stored; the caller decides visibility.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(mapping))` if found
    /// - `Ok(None)` if not found
    async fn get(&self, short_code: &str) -> Result<Option<UrlMapping>, StoreError>;

    /// Removes a mapping. Deleting a missing code succeeds.
    async fn delete(&self, short_code: &str) -> Result<(), StoreError>;

    /// Adds one to the mapping's hit count. Missing codes are ignored.
    async fn increment_hit_count(&self, short_code: &str) -> Result<(), StoreError>;

    /// Checks if the store backend is reachable.
    async fn health_check(&self) -> bool;
}
