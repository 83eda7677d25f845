use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};

use crate::core::error::Result;
use crate::features::rate_limits::dtos::RateLimitStatusDto;
use crate::features::rate_limits::middleware::request_client_key;
use crate::features::rate_limits::services::RateLimitService;
use crate::shared::types::ApiResponse;

/// Get the caller's rate limit status
///
/// Peeks at the caller's window without consuming a request.
#[utoipa::path(
    get,
    path = "/api/rate-limit",
    responses(
        (status = 200, description = "Caller's rate limit status", body = ApiResponse<RateLimitStatusDto>),
    ),
    tag = "rate-limits"
)]
pub async fn get_rate_limit_status(
    State(service): State<Arc<RateLimitService>>,
    req: Request,
) -> Result<Json<ApiResponse<RateLimitStatusDto>>> {
    let key = request_client_key(&req);
    let status = service.status(&key).await?;

    Ok(Json(ApiResponse::success(Some(status.into()), None, None)))
}
