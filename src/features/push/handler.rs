use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::push::PushSettings;
use crate::shared::types::ApiResponse;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VapidKeyDto {
    /// Base64url-encoded P-256 public key passed to `PushManager.subscribe`
    pub public_key: String,
}

/// Get the VAPID public key
#[utoipa::path(
    get,
    path = "/api/public/push/vapid-key",
    responses(
        (status = 200, description = "VAPID public key", body = ApiResponse<VapidKeyDto>),
        (status = 404, description = "Push notifications are not configured")
    ),
    tag = "push"
)]
pub async fn get_vapid_key(
    State(settings): State<Arc<PushSettings>>,
) -> Result<Json<ApiResponse<VapidKeyDto>>> {
    let public_key = settings
        .vapid_public_key
        .clone()
        .ok_or_else(|| AppError::NotFound("Push notifications are not configured".to_string()))?;

    Ok(Json(ApiResponse::success(
        Some(VapidKeyDto { public_key }),
        None,
        None,
    )))
}
