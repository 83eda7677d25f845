use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::bookings::handlers;
use crate::features::bookings::services::BookingService;

/// Public booking submission (rate limited by the caller)
pub fn public_routes(service: Arc<BookingService>) -> Router {
    Router::new()
        .route(
            "/api/public/sites/{site}/bookings",
            post(handlers::create_booking),
        )
        .with_state(service)
}

/// Owner booking management (auth middleware is applied by the caller)
pub fn protected_routes(service: Arc<BookingService>) -> Router {
    Router::new()
        .route("/api/websites/{id}/bookings", get(handlers::list_bookings))
        .route(
            "/api/websites/{id}/bookings/{booking_id}/status",
            patch(handlers::update_booking_status),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, with_owner_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    const SITE: &str = "0190f3a4-7c1e-7d2a-9b3c-123456789abc";

    fn service() -> Arc<BookingService> {
        Arc::new(BookingService::new(lazy_pool()))
    }

    #[tokio::test]
    async fn test_invalid_public_booking_rejected_before_database() {
        let server = TestServer::new(public_routes(service())).unwrap();

        let response = server
            .post(&format!("/api/public/sites/{}/bookings", SITE))
            .json(&json!({
                "customer_name": "Ana Souza",
                "customer_email": "not-an-email",
                "booking_date": "2030-06-01",
                "booking_time": "19:30",
                "party_size": 2,
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_past_booking_rejected_before_database() {
        let server = TestServer::new(public_routes(service())).unwrap();

        let response = server
            .post(&format!("/api/public/sites/{}/bookings", SITE))
            .json(&json!({
                "customer_name": "Ana Souza",
                "customer_email": "ana@example.com",
                "booking_date": "2001-01-01",
                "booking_time": "19:30",
                "party_size": 2,
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_site_id_is_not_found() {
        let server = TestServer::new(public_routes(service())).unwrap();

        let response = server
            .post("/api/public/sites/not-a-site/bookings")
            .json(&json!({
                "customer_name": "Ana Souza",
                "customer_email": "ana@example.com",
                "booking_date": "2030-06-01",
                "booking_time": "19:30",
                "party_size": 2,
            }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_owner_routes_require_user() {
        let server = TestServer::new(protected_routes(service())).unwrap();

        let response = server.get(&format!("/api/websites/{}/bookings", SITE)).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_date_filter_rejected() {
        let server = TestServer::new(with_owner_auth(protected_routes(service()))).unwrap();

        let response = server
            .get(&format!("/api/websites/{}/bookings?date=tomorrow", SITE))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
