//! Pure helper functions shared across layers.
//!
//! - [`code_encoder`] - Base62 mapping between identifiers and short codes
//! - [`url_normalizer`] - Target URL validation and canonicalization

pub mod code_encoder;
pub mod url_normalizer;
