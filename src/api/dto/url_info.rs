//! DTO for short link lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::UrlMapping;

/// Public view of a stored mapping.
#[derive(Debug, Serialize, Deserialize)]
pub struct UrlInfoResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Hits applied to the store; excludes hits still queued for the worker.
    pub hit_count: u64,
}

impl UrlInfoResponse {
    pub fn new(mapping: UrlMapping, short_url: String) -> Self {
        Self {
            short_code: mapping.short_code,
            short_url,
            original_url: mapping.original_url,
            created_at: mapping.created_at,
            expires_at: mapping.expires_at,
            hit_count: mapping.hit_count,
        }
    }
}
