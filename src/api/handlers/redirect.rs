//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Decode the code (malformed codes are reported as not found)
/// 2. Check the resolution cache
/// 3. On miss or cache outage, read the mapping store and warm the cache
/// 4. Queue a hit event for the background worker
/// 5. Return 307 Temporary Redirect
///
/// # Errors
///
/// - **404 Not Found**: Code is malformed, unknown or expired
/// - **503 Service Unavailable**: Store is unreachable on a cache miss
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mapping = state.shortener.resolve(&code).await?;

    Ok(Redirect::temporary(&mapping.original_url))
}
