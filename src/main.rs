mod core;
mod features;
mod shared;

use crate::core::config::Config;
use crate::core::cors::CorsPolicy;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::{routes as auth_routes, JwtValidator};
use crate::features::bookings::{routes as bookings_routes, BookingService};
use crate::features::orders::{routes as orders_routes, OrderService};
use crate::features::push::{routes as push_routes, PushSettings};
use crate::features::rate_limits::{
    rate_limit_middleware, routes as rate_limits_routes, RateLimitService,
};
use crate::features::reviews::{routes as reviews_routes, ReviewService};
use crate::features::websites::{routes as websites_routes, WebsiteService};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1),
        worker_threads,
        std::process::id()
    );
    tracing::info!(
        "Configuration loaded: environment={}, platform_domain={}",
        config.app.environment,
        config.app.platform_domain
    );

    let pool = database::create_pool(&config.database).await?;
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // Auth
    let jwt_validator = Arc::new(JwtValidator::new(
        &config.auth.jwt_secret,
        config.auth.audience.clone(),
        config.auth.jwt_leeway,
    ));
    tracing::info!("Auth configuration initialized");

    // CORS
    let cors_policy = Arc::new(CorsPolicy::from_config(&config.cors));
    tracing::info!(
        "CORS policy initialized: domains={:?}, dev_hosts={}",
        config.cors.allowed_domains,
        config.cors.allow_dev_hosts
    );

    // Rate limiting
    let rate_limit_service = Arc::new(RateLimitService::from_config(
        &config.rate_limit,
        pool.clone(),
    ));
    Arc::clone(&rate_limit_service).spawn_purge_task();
    tracing::info!(
        "Rate limiter initialized: {} requests per {}s, store={:?}",
        config.rate_limit.max_requests,
        config.rate_limit.window.as_secs(),
        config.rate_limit.store
    );

    // Domain services
    let website_service = Arc::new(WebsiteService::new(
        pool.clone(),
        config.app.platform_domain.clone(),
    ));
    let booking_service = Arc::new(BookingService::new(pool.clone()));
    let order_service = Arc::new(OrderService::new(pool.clone()));
    let review_service = Arc::new(ReviewService::new(pool.clone()));
    let push_settings = Arc::new(PushSettings {
        vapid_public_key: config.app.vapid_public_key.clone(),
    });
    tracing::info!("Domain services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(websites_routes::protected_routes(Arc::clone(&website_service)))
        .merge(bookings_routes::protected_routes(Arc::clone(&booking_service)))
        .merge(orders_routes::protected_routes(Arc::clone(&order_service)))
        .merge(reviews_routes::protected_routes(Arc::clone(&review_service)))
        .route_layer(from_fn_with_state(
            jwt_validator.clone(),
            middleware::auth_middleware,
        ));

    // Public routes hit by tenant sites (rate limited per client)
    let public_routes = Router::new()
        .merge(websites_routes::public_routes(website_service))
        .merge(bookings_routes::public_routes(booking_service))
        .merge(orders_routes::public_routes(order_service))
        .merge(reviews_routes::public_routes(review_service))
        .merge(push_routes::routes(push_settings))
        .route_layer(from_fn_with_state(
            Arc::clone(&rate_limit_service),
            rate_limit_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(rate_limits_routes::routes(rate_limit_service))
        .merge(health_route)
        .layer(RequestBodyLimitLayer::new(config.app.max_request_body_size))
        .layer(from_fn_with_state(cors_policy, middleware::cors_middleware))
        .layer(
            ServiceBuilder::new()
                // Generate X-Request-Id using UUID v7 (or use client-provided one)
                .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(middleware::MakeSpanWithRequestId)
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                // Propagate X-Request-Id to response headers
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

    // Start server
    let addr = config.app.server_address();
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    // Peer address feeds the rate limiter when no proxy headers are present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
