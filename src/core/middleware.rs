use crate::core::cors::{CorsDecision, CorsPolicy};
use crate::core::error::AppError;
use crate::features::auth::JwtValidator;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

/// Apply the CORS policy: answer preflights directly, decorate everything else.
///
/// Denied simple requests still reach the handler but get no CORS headers, leaving
/// enforcement to the browser.
pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(origin) = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
    else {
        return next.run(req).await;
    };

    let is_preflight = req.method() == Method::OPTIONS;

    match policy.evaluate(&origin) {
        CorsDecision::Allowed(cors_headers) => {
            let mut response = if is_preflight {
                StatusCode::NO_CONTENT.into_response()
            } else {
                next.run(req).await
            };
            merge_cors_headers(response.headers_mut(), cors_headers);
            response
        }
        CorsDecision::Denied => {
            if is_preflight {
                tracing::debug!("Rejected CORS preflight from origin {}", origin);
                return AppError::Forbidden("Origin not allowed".to_string()).into_response();
            }
            next.run(req).await
        }
    }
}

fn merge_cors_headers(target: &mut HeaderMap, cors_headers: HeaderMap) {
    for (name, value) in cors_headers.iter() {
        if name == header::VARY {
            target.append(name.clone(), value.clone());
        } else {
            target.insert(name.clone(), value.clone());
        }
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(encoded) = auth_header.and_then(|h| h.strip_prefix("Basic ")) {
                let decoded = BASE64_STANDARD
                    .decode(encoded)
                    .ok()
                    .and_then(|bytes| String::from_utf8(bytes).ok());
                if decoded.as_deref() == Some(credentials.as_str()) {
                    return Ok(next.run(req).await);
                }
            }

            let mut response = Response::new(Body::from("Unauthorized"));
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"Swagger UI\""),
            );

            Err(response)
        })
    }
}

pub async fn auth_middleware(
    State(validator): State<Arc<JwtValidator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let user = validator.validate_token(token)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderName, middleware::from_fn_with_state, routing::get, Router};
    use axum_test::TestServer;

    fn cors_app(dev_hosts: bool) -> Router {
        let policy = Arc::new(CorsPolicy::new(vec!["example.com".to_string()], dev_hosts));
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(from_fn_with_state(policy, cors_middleware))
    }

    fn origin(value: &'static str) -> (HeaderName, HeaderValue) {
        (header::ORIGIN, HeaderValue::from_static(value))
    }

    #[tokio::test]
    async fn test_allowed_origin_gets_headers() {
        let server = TestServer::new(cors_app(false)).unwrap();
        let (name, value) = origin("https://www.example.com");

        let response = server.get("/ping").add_header(name, value).await;

        response.assert_status_ok();
        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            "https://www.example.com"
        );
    }

    #[tokio::test]
    async fn test_denied_origin_gets_no_headers() {
        let server = TestServer::new(cors_app(false)).unwrap();
        let (name, value) = origin("https://evil.com");

        let response = server.get("/ping").add_header(name, value).await;

        response.assert_status_ok();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_preflight() {
        let server = TestServer::new(cors_app(true)).unwrap();

        let (name, value) = origin("http://localhost:3000");
        let allowed = server
            .method(Method::OPTIONS, "/ping")
            .add_header(name, value)
            .await;
        allowed.assert_status(StatusCode::NO_CONTENT);
        assert_eq!(
            allowed.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            "http://localhost:3000"
        );

        let (name, value) = origin("https://evil.com");
        let denied = server
            .method(Method::OPTIONS, "/ping")
            .add_header(name, value)
            .await;
        denied.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_basic_auth() {
        let app = Router::new()
            .route("/docs", get(|| async { "docs" }))
            .layer(axum::middleware::from_fn(basic_auth_middleware(Arc::new(
                "admin:secret".to_string(),
            ))));
        let server = TestServer::new(app).unwrap();

        server
            .get("/docs")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let encoded = format!("Basic {}", BASE64_STANDARD.encode("admin:secret"));
        server
            .get("/docs")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&encoded).unwrap(),
            )
            .await
            .assert_status_ok();
    }
}
