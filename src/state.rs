//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ShortenerService;

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
    /// Prefix of returned short URLs, without a trailing slash.
    pub base_url: String,
}

impl AppState {
    pub fn new(shortener: Arc<ShortenerService>, base_url: impl Into<String>) -> Self {
        Self {
            shortener,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Public URL for a short code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }
}
