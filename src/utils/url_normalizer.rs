//! Validation and canonicalization of target URLs.
//!
//! Only absolute `http`/`https` URLs with a host are accepted. The host is
//! lowercased and a default port is dropped; path, query and fragment are kept
//! verbatim so a redirect lands exactly where the caller asked.

use url::Url;

/// Upper bound on accepted target URL length, in bytes.
pub const MAX_URL_LEN: usize = 2048;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL is longer than {MAX_URL_LEN} bytes")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Parses `input` as an absolute URL and returns its canonical form.
///
/// # Errors
///
/// See [`UrlNormalizationError`] for the rejection reasons.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_url("HTTPS://Example.COM:443/a#top").unwrap(),
///     "https://example.com/a#top"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }
    if input.len() > MAX_URL_LEN {
        return Err(UrlNormalizationError::TooLong);
    }

    // `Url::parse` only accepts absolute URLs, so relative input fails here
    // The parser lowercases domain hosts and strips default ports itself
    let url = Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::MissingHost);
    }

    Ok(url.to_string())
}
