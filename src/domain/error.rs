//! Errors produced by the shortening engine.

use crate::domain::repositories::{AllocatorError, StoreError};
use crate::utils::code_encoder::CodeError;
use crate::utils::url_normalizer::UrlNormalizationError;

/// Failure of a Create, Resolve or Delete operation.
///
/// Cache failures have no variant: the cache absorbs them and reports a miss.
#[derive(Debug, thiserror::Error)]
pub enum ShortenerError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlNormalizationError),

    #[error("Expiry must be in the future")]
    InvalidExpiry,

    #[error("Invalid short code: {0}")]
    InvalidCode(#[from] CodeError),

    #[error("Short code not found: {0}")]
    NotFound(String),

    #[error("Identifier allocator unavailable: {0}")]
    AllocatorUnavailable(String),

    #[error("Mapping store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Short code already stored: {0}")]
    DuplicateCode(String),

    #[error("Service unavailable after {attempts} allocation attempts")]
    ServiceUnavailable { attempts: usize },
}

impl From<StoreError> for ShortenerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateCode(code) => Self::DuplicateCode(code),
            StoreError::Unavailable(reason) => Self::StoreUnavailable(reason),
        }
    }
}

impl From<AllocatorError> for ShortenerError {
    fn from(e: AllocatorError) -> Self {
        Self::AllocatorUnavailable(e.to_string())
    }
}
