//! Handlers for individual short links.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::url_info::UrlInfoResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the mapping behind a short code.
///
/// # Endpoint
///
/// `GET /api/v1/urls/{code}`
///
/// Reads the store directly and does not count as a hit, so `hit_count`
/// reflects every hit the worker has applied.
///
/// # Errors
///
/// - **404 Not Found**: Code is malformed, unknown or expired
/// - **503 Service Unavailable**: Store is unreachable
pub async fn get_url_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<UrlInfoResponse>, AppError> {
    let mapping = state.shortener.lookup(&code).await?;
    let short_url = state.short_url(&mapping.short_code);

    Ok(Json(UrlInfoResponse::new(mapping, short_url)))
}

/// Deletes a short link.
///
/// # Endpoint
///
/// `DELETE /api/v1/urls/{code}`
///
/// Idempotent: deleting an unknown code also returns **204 No Content**.
///
/// # Errors
///
/// - **503 Service Unavailable**: Store is unreachable
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    state.shortener.delete(&code).await?;

    Ok(StatusCode::NO_CONTENT)
}
