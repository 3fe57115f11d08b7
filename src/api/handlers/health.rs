//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Store**: Trivial query against the mapping store
/// 2. **Allocator**: Counter backend reachability
/// 3. **Cache**: Cache backend reachability (always ok when disabled)
/// 4. **Hit Queue**: Channel is open; reports remaining capacity
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "Reachable" },
///     "allocator": { "status": "ok", "message": "Reachable" },
///     "cache": { "status": "ok", "message": "Reachable" },
///     "hit_queue": { "status": "ok", "message": "Capacity: 10000" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let health = state.shortener.health().await;

    let checks = HealthChecks {
        store: CheckStatus::from_probe(health.store, "Reachable", "Mapping store unreachable"),
        allocator: CheckStatus::from_probe(
            health.allocator,
            "Reachable",
            "Identifier allocator unreachable",
        ),
        cache: CheckStatus::from_probe(health.cache, "Reachable", "Cache unreachable"),
        hit_queue: CheckStatus::from_probe(
            health.hit_queue_open,
            format!("Capacity: {}", health.hit_queue_capacity),
            "Hit queue is closed",
        ),
    };

    let all_healthy = checks.store.is_ok()
        && checks.allocator.is_ok()
        && checks.cache.is_ok()
        && checks.hit_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
