use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::orders::handlers;
use crate::features::orders::services::OrderService;

/// Public order placement (rate limited by the caller)
pub fn public_routes(service: Arc<OrderService>) -> Router {
    Router::new()
        .route("/api/public/sites/{site}/orders", post(handlers::create_order))
        .with_state(service)
}

/// Owner order management (auth middleware is applied by the caller)
pub fn protected_routes(service: Arc<OrderService>) -> Router {
    Router::new()
        .route("/api/websites/{id}/orders", get(handlers::list_orders))
        .route("/api/websites/{id}/orders/{order_id}", get(handlers::get_order))
        .route(
            "/api/websites/{id}/orders/{order_id}/status",
            patch(handlers::update_order_status),
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

    fn service() -> Arc<OrderService> {
        Arc::new(OrderService::new(lazy_pool()))
    }

    #[tokio::test]
    async fn test_empty_order_rejected_before_database() {
        let server = TestServer::new(public_routes(service())).unwrap();

        let response = server
            .post(&format!("/api/public/sites/{}/orders", SITE))
            .json(&json!({
                "customer_name": "Ana Souza",
                "customer_email": "ana@example.com",
                "items": [],
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_every_invalid_field_is_reported() {
        let server = TestServer::new(public_routes(service())).unwrap();

        let response = server
            .post(&format!("/api/public/sites/{}/orders", SITE))
            .json(&json!({
                "customer_name": "Ana Souza",
                "customer_email": "not-an-email",
                "items": [
                    { "name": "Margherita", "quantity": 0, "unit_price": "0.005" },
                ],
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&json!("customer_email: Invalid email format")));
        assert!(errors.contains(&json!("items[0].quantity: Quantity must be between 1 and 99")));
    }

    #[tokio::test]
    async fn test_oversized_order_total_rejected_before_database() {
        let server = TestServer::new(public_routes(service())).unwrap();

        let response = server
            .post(&format!("/api/public/sites/{}/orders", SITE))
            .json(&json!({
                "customer_name": "Ana Souza",
                "customer_email": "ana@example.com",
                "items": [
                    {
                        "name": "Gold",
                        "quantity": 99,
                        "unit_price": "79228162514264337593543950335",
                    },
                ],
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_owner_routes_require_user() {
        let server = TestServer::new(protected_routes(service())).unwrap();

        let response = server.get(&format!("/api/websites/{}/orders", SITE)).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_status_rejected() {
        let server = TestServer::new(with_owner_auth(protected_routes(service()))).unwrap();

        let response = server
            .patch(&format!(
                "/api/websites/{}/orders/0190f3a4-7c1e-7d2a-9b3c-000000000001/status",
                SITE
            ))
            .json(&json!({ "status": "shipped" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
