//! Per-client rate limiting for the JSON API.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Sustained requests per second allowed per client IP.
pub const REQUESTS_PER_SECOND: u64 = 5;
/// Requests a client may burst before throttling starts.
pub const BURST_SIZE: u32 = 50;

pub type ApiGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates the rate limiter applied to `/api/v1/*`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Limits are
/// keyed on the socket peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// Redirects are not limited; they are the hot path and cost one cache read.
pub fn layer() -> ApiGovernorLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(REQUESTS_PER_SECOND)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("rate limit constants are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
