use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::push::handler;
use crate::features::push::PushSettings;

pub fn routes(settings: Arc<PushSettings>) -> Router {
    Router::new()
        .route("/api/public/push/vapid-key", get(handler::get_vapid_key))
        .with_state(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_vapid_key_served_when_configured() {
        let settings = PushSettings {
            vapid_public_key: Some("BEl62iUYgUivxIkv69yViEuiBIa".to_string()),
        };
        let server = TestServer::new(routes(Arc::new(settings))).unwrap();

        let response = server.get("/api/public/push/vapid-key").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["public_key"], "BEl62iUYgUivxIkv69yViEuiBIa");
    }

    #[tokio::test]
    async fn test_vapid_key_missing() {
        let server = TestServer::new(routes(Arc::new(PushSettings::default()))).unwrap();

        let response = server.get("/api/public/push/vapid-key").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
