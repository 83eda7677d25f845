use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::features::rate_limits::models::RateLimitResult;

/// Response DTO for the caller's rate limit status
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RateLimitStatusDto {
    /// Maximum requests allowed per window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// Whether the next request would be accepted
    pub allowed: bool,
    /// When the current window ends
    pub reset_at: DateTime<Utc>,
}

impl From<RateLimitResult> for RateLimitStatusDto {
    fn from(result: RateLimitResult) -> Self {
        Self {
            limit: result.limit,
            remaining: result.remaining,
            allowed: result.allowed,
            reset_at: result.reset_at,
        }
    }
}
