//! API route configuration.

use crate::api::handlers::{delete_url_handler, get_url_handler, ping_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Versioned JSON API, mounted under `/api/v1`.
///
/// # Endpoints
///
/// - `GET    /ping`         - Liveness probe
/// - `POST   /urls`         - Create a short link
/// - `GET    /urls/{code}`  - Look up a short link
/// - `DELETE /urls/{code}`  - Delete a short link
pub fn v1_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping_handler))
        .route("/urls", post(shorten_handler))
        .route("/urls/{code}", get(get_url_handler).delete(delete_url_handler))
}
