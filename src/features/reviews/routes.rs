use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::reviews::handlers;
use crate::features::reviews::services::ReviewService;

/// Public review submission and listing (rate limited by the caller)
pub fn public_routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route(
            "/api/public/sites/{site}/reviews",
            get(handlers::list_published_reviews).post(handlers::create_review),
        )
        .with_state(service)
}

/// Owner moderation (auth middleware is applied by the caller)
pub fn protected_routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route("/api/websites/{id}/reviews", get(handlers::list_reviews))
        .route(
            "/api/websites/{id}/reviews/{review_id}",
            patch(handlers::publish_review),
        )
        .with_state(service)
}
