//! Handler for link creation endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /api/v1/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "expires_at": "2030-01-01T00:00:00Z"   // optional
/// }
/// ```
///
/// # Response
///
/// **201 Created**
///
/// ```json
/// {
///   "short_code": "4C92",
///   "short_url": "https://sho.rt/4C92",
///   "original_url": "https://example.com/some/long/path",
///   "expires_at": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: URL is not an absolute http(s) URL, or expiry is in the past
/// - **503 Service Unavailable**: Counter or store is unreachable
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let mapping = state
        .shortener
        .create(&payload.url, payload.expires_at)
        .await?;

    let short_url = state.short_url(&mapping.short_code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse::new(mapping, short_url)),
    ))
}
