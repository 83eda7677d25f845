use std::sync::Arc;

use axum::{routing::get, Router};

use super::handlers::get_rate_limit_status;
use super::services::RateLimitService;

/// Public rate limit status route; not itself rate limited
pub fn routes(service: Arc<RateLimitService>) -> Router {
    Router::new()
        .route("/api/rate-limit", get(get_rate_limit_status))
        .with_state(service)
}
