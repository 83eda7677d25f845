//! Fixed-window rate limiting for the public API.
//!
//! Counters live in a [`services::RateLimitStore`]: in process memory for single-instance
//! deployments, or in Postgres when several instances must share one budget per client.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/rate-limit` | No | Caller's current window |

pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use middleware::rate_limit_middleware;
pub use services::RateLimitService;
