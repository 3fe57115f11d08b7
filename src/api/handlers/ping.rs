//! Liveness endpoint.

use axum::Json;

use crate::api::dto::health::PingResponse;

/// Answers without touching any backend.
///
/// # Endpoint
///
/// `GET /api/v1/ping`
pub async fn ping_handler() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong".to_string(),
    })
}
