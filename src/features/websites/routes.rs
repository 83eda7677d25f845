use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::websites::handlers;
use crate::features::websites::services::WebsiteService;

/// Public site resolution used by the template renderer
pub fn public_routes(service: Arc<WebsiteService>) -> Router {
    Router::new()
        .route("/api/public/sites/{site}", get(handlers::resolve_website))
        .with_state(service)
}

/// Owner and admin routes (auth middleware is applied by the caller)
pub fn protected_routes(service: Arc<WebsiteService>) -> Router {
    Router::new()
        .route(
            "/api/websites",
            get(handlers::list_websites).post(handlers::create_website),
        )
        .route(
            "/api/websites/{id}",
            get(handlers::get_website)
                .patch(handlers::update_website)
                .delete(handlers::delete_website),
        )
        .route(
            "/api/websites/{id}/sections",
            get(handlers::get_sections).put(handlers::replace_sections),
        )
        .route("/api/websites/{id}/sections/move", post(handlers::move_section))
        .route(
            "/api/websites/{id}/sections/{section_id}/visibility",
            post(handlers::set_section_visibility),
        )
        .route("/api/admin/websites", get(handlers::list_all_websites))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, with_owner_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn service() -> Arc<WebsiteService> {
        Arc::new(WebsiteService::new(lazy_pool(), "sitekit.app".to_string()))
    }

    #[tokio::test]
    async fn test_protected_routes_require_user() {
        let server = TestServer::new(protected_routes(service())).unwrap();

        let response = server.get("/api/websites").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .post("/api/websites/0190f3a4-7c1e-7d2a-9b3c-123456789abc/sections/move")
            .json(&json!({ "from_index": 0, "to_index": 1 }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_listing_forbidden_for_owner() {
        let server = TestServer::new(with_owner_auth(protected_routes(service()))).unwrap();

        let response = server.get("/api/admin/websites").await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_move_body_rejected_before_database() {
        let server = TestServer::new(with_owner_auth(protected_routes(service()))).unwrap();

        let response = server
            .post("/api/websites/0190f3a4-7c1e-7d2a-9b3c-123456789abc/sections/move")
            .json(&json!({ "from_index": -1, "to_index": 0 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_invalid_create_rejected_before_database() {
        let server = TestServer::new(with_owner_auth(protected_routes(service()))).unwrap();

        let response = server
            .post("/api/websites")
            .json(&json!({
                "name": "Bistro Verde",
                "subdomain": "Not A Subdomain",
                "business_type": "restaurant",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_business_type_rejected() {
        let server = TestServer::new(with_owner_auth(protected_routes(service()))).unwrap();

        let response = server
            .post("/api/websites")
            .json(&json!({
                "name": "Bistro Verde",
                "subdomain": "bistro-verde",
                "business_type": "spaceport",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
