use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::websites::dtos::{
    CreateWebsiteDto, PublicWebsiteDto, UpdateWebsiteDto, WebsiteResponseDto,
};
use crate::features::websites::services::WebsiteService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Resolve the website served at a host
///
/// Used by the template renderer: accepts a platform subdomain (`bistro`,
/// `bistro.sitekit.app`) or a custom domain, with or without scheme and port.
#[utoipa::path(
    get,
    path = "/api/public/sites/{site}",
    params(
        ("site" = String, Path, description = "Request host, e.g. bistro.sitekit.app")
    ),
    responses(
        (status = 200, description = "Website found", body = ApiResponse<PublicWebsiteDto>),
        (status = 404, description = "No active website at this host")
    ),
    tag = "websites"
)]
pub async fn resolve_website(
    State(service): State<Arc<WebsiteService>>,
    Path(site): Path<String>,
) -> Result<Json<ApiResponse<PublicWebsiteDto>>> {
    let website = service.resolve(&site).await?;
    Ok(Json(ApiResponse::success(Some(website), None, None)))
}

/// Create a website
#[utoipa::path(
    post,
    path = "/api/websites",
    request_body = CreateWebsiteDto,
    responses(
        (status = 201, description = "Website created", body = ApiResponse<WebsiteResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Creating a site for another client requires admin"),
        (status = 409, description = "Subdomain or domain taken, or client already has an active site")
    ),
    security(("bearer_auth" = [])),
    tag = "websites"
)]
pub async fn create_website(
    user: AuthenticatedUser,
    State(service): State<Arc<WebsiteService>>,
    ValidatedJson(dto): ValidatedJson<CreateWebsiteDto>,
) -> Result<(StatusCode, Json<ApiResponse<WebsiteResponseDto>>)> {
    let website = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(website),
            Some("Website created".to_string()),
            None,
        )),
    ))
}

/// List the caller's websites
#[utoipa::path(
    get,
    path = "/api/websites",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Caller's websites", body = ApiResponse<Vec<WebsiteResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "websites"
)]
pub async fn list_websites(
    user: AuthenticatedUser,
    State(service): State<Arc<WebsiteService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<WebsiteResponseDto>>>> {
    let (websites, total) = service
        .list_for_client(&user.user_id, pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(websites),
        None,
        Some(Meta::total(total)),
    )))
}

/// List every website on the platform (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/websites",
    params(PaginationQuery),
    responses(
        (status = 200, description = "All websites", body = ApiResponse<Vec<WebsiteResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_all_websites(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<WebsiteService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<WebsiteResponseDto>>>> {
    let (websites, total) = service
        .list_all(pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(websites),
        None,
        Some(Meta::total(total)),
    )))
}

/// Get a website by ID
#[utoipa::path(
    get,
    path = "/api/websites/{id}",
    params(
        ("id" = Uuid, Path, description = "Website ID")
    ),
    responses(
        (status = 200, description = "Website found", body = ApiResponse<WebsiteResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website not found")
    ),
    security(("bearer_auth" = [])),
    tag = "websites"
)]
pub async fn get_website(
    user: AuthenticatedUser,
    State(service): State<Arc<WebsiteService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WebsiteResponseDto>>> {
    let website = service.get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(website), None, None)))
}

/// Update a website
#[utoipa::path(
    patch,
    path = "/api/websites/{id}",
    params(
        ("id" = Uuid, Path, description = "Website ID")
    ),
    request_body = UpdateWebsiteDto,
    responses(
        (status = 200, description = "Website updated", body = ApiResponse<WebsiteResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website not found"),
        (status = 409, description = "Custom domain in use or client already has an active site")
    ),
    security(("bearer_auth" = [])),
    tag = "websites"
)]
pub async fn update_website(
    user: AuthenticatedUser,
    State(service): State<Arc<WebsiteService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateWebsiteDto>,
) -> Result<Json<ApiResponse<WebsiteResponseDto>>> {
    let website = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(website),
        Some("Website updated".to_string()),
        None,
    )))
}

/// Deactivate a website
///
/// Soft delete: the site stops resolving but its bookings, orders and reviews remain.
#[utoipa::path(
    delete,
    path = "/api/websites/{id}",
    params(
        ("id" = Uuid, Path, description = "Website ID")
    ),
    responses(
        (status = 200, description = "Website deactivated"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website not found")
    ),
    security(("bearer_auth" = [])),
    tag = "websites"
)]
pub async fn delete_website(
    user: AuthenticatedUser,
    State(service): State<Arc<WebsiteService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.deactivate(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Website deactivated".to_string()),
        None,
    )))
}
