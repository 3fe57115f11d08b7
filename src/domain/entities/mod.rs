//! Core domain entities.
//!
//! - [`UrlMapping`] - A short code and the URL it resolves to

pub mod url_mapping;

pub use url_mapping::{MAPPING_KEY_PREFIX, UrlMapping, mapping_key};
