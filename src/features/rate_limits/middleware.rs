use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::core::error::AppError;
use crate::features::rate_limits::models::RateLimitResult;
use crate::features::rate_limits::services::RateLimitService;

const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Derive the limiter key for a request.
///
/// Order: first `X-Forwarded-For` hop, `X-Real-IP`, socket peer, then "unknown".
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or(real_ip)
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn request_client_key(req: &Request) -> String {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    client_key(req.headers(), peer)
}

fn apply_rate_limit_headers(headers: &mut HeaderMap, result: &RateLimitResult) {
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(result.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(result.remaining));
    headers.insert(
        X_RATELIMIT_RESET,
        HeaderValue::from(result.reset_at.timestamp()),
    );
}

/// Fixed-window limiting keyed by client IP.
///
/// A failing store lets the request through.
pub async fn rate_limit_middleware(
    State(service): State<Arc<RateLimitService>>,
    req: Request,
    next: Next,
) -> Response {
    let key = request_client_key(&req);

    let result = match service.check(&key).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("Rate limit check failed for {}, allowing request: {}", key, e);
            return next.run(req).await;
        }
    };

    if !result.allowed {
        tracing::warn!(client = %key, limit = result.limit, "Rate limit exceeded");
        let mut response =
            AppError::RateLimitExceeded("Too many requests, please try again later".to_string())
                .into_response();
        apply_rate_limit_headers(response.headers_mut(), &result);
        response.headers_mut().insert(
            axum::http::header::RETRY_AFTER,
            HeaderValue::from(result.retry_after_secs(Utc::now())),
        );
        return response;
    }

    let mut response = next.run(req).await;
    apply_rate_limit_headers(response.headers_mut(), &result);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::rate_limits::services::MemoryRateLimitStore;
    use axum::{http::StatusCode, middleware::from_fn_with_state, routing::get, Router};
    use axum_test::TestServer;

    fn app(limit: u32) -> Router {
        let service = Arc::new(RateLimitService::new(
            Arc::new(MemoryRateLimitStore::new()),
            limit,
            std::time::Duration::from_secs(60),
        ));
        Router::new()
            .route("/sites", get(|| async { "ok" }))
            .layer(from_fn_with_state(service, rate_limit_middleware))
    }

    fn forwarded_for(ip: &'static str) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static(ip),
        )
    }

    #[test]
    fn test_client_key_order() {
        let mut headers = HeaderMap::new();
        let peer: SocketAddr = "192.168.1.9:5000".parse().unwrap();
        assert_eq!(client_key(&headers, Some(peer)), "192.168.1.9");
        assert_eq!(client_key(&headers, None), "unknown");

        headers.insert("x-real-ip", HeaderValue::from_static("10.1.1.1"));
        assert_eq!(client_key(&headers, Some(peer)), "10.1.1.1");

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_key(&headers, Some(peer)), "203.0.113.7");
    }

    #[tokio::test]
    async fn test_denies_after_limit() {
        let server = TestServer::new(app(2)).unwrap();

        for remaining in ["1", "0"] {
            let (name, value) = forwarded_for("203.0.113.7");
            let response = server.get("/sites").add_header(name, value).await;
            response.assert_status_ok();
            assert_eq!(response.header("x-ratelimit-remaining"), remaining);
            assert_eq!(response.header("x-ratelimit-limit"), "2");
        }

        let (name, value) = forwarded_for("203.0.113.7");
        let denied = server.get("/sites").add_header(name, value).await;
        denied.assert_status(StatusCode::TOO_MANY_REQUESTS);
        assert!(denied.headers().contains_key("retry-after"));

        let body: serde_json::Value = denied.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_clients_limited_separately() {
        let server = TestServer::new(app(1)).unwrap();

        let (name, value) = forwarded_for("203.0.113.7");
        server
            .get("/sites")
            .add_header(name, value)
            .await
            .assert_status_ok();

        let (name, value) = forwarded_for("198.51.100.4");
        server
            .get("/sites")
            .add_header(name, value)
            .await
            .assert_status_ok();
    }
}
