//! UrlMapping entity representing one shortened URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Namespace prefix for mapping keys in key-value backends.
pub const MAPPING_KEY_PREFIX: &str = "url:";

/// Builds the key-value key for a short code (`url:<code>`).
pub fn mapping_key(short_code: &str) -> String {
    format!("{}{}", MAPPING_KEY_PREFIX, short_code)
}

/// The record behind a short code.
///
/// The mapping store owns the authoritative instance; caches only ever hold
/// a serialized copy, so `hit_count` read from a cache may lag behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlMapping {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub hit_count: u64,
}

impl UrlMapping {
    /// Creates a fresh mapping with a zero hit count.
    pub fn new(
        short_code: String,
        original_url: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            short_code,
            original_url,
            created_at,
            expires_at,
            hit_count: 0,
        }
    }

    /// Returns true if the mapping has an expiry at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    /// Returns true if the mapping has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
