use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::websites::dtos::{MoveSectionDto, ReplaceSectionsDto, SectionVisibilityDto};
use crate::features::websites::sections::SectionEntry;
use crate::features::websites::services::WebsiteService;
use crate::shared::types::ApiResponse;

/// Get a website's section layout, hidden sections included
#[utoipa::path(
    get,
    path = "/api/websites/{id}/sections",
    params(
        ("id" = Uuid, Path, description = "Website ID")
    ),
    responses(
        (status = 200, description = "Ordered sections", body = ApiResponse<Vec<SectionEntry>>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website not found")
    ),
    security(("bearer_auth" = [])),
    tag = "sections"
)]
pub async fn get_sections(
    user: AuthenticatedUser,
    State(service): State<Arc<WebsiteService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<SectionEntry>>>> {
    let sections = service.get_sections(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(sections), None, None)))
}

/// Replace the whole section layout
#[utoipa::path(
    put,
    path = "/api/websites/{id}/sections",
    params(
        ("id" = Uuid, Path, description = "Website ID")
    ),
    request_body = ReplaceSectionsDto,
    responses(
        (status = 200, description = "Sections replaced", body = ApiResponse<Vec<SectionEntry>>),
        (status = 400, description = "Unknown, duplicate or disallowed section"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website not found")
    ),
    security(("bearer_auth" = [])),
    tag = "sections"
)]
pub async fn replace_sections(
    user: AuthenticatedUser,
    State(service): State<Arc<WebsiteService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<ReplaceSectionsDto>,
) -> Result<Json<ApiResponse<Vec<SectionEntry>>>> {
    let sections = service.replace_sections(&user, id, dto.sections).await?;
    Ok(Json(ApiResponse::success(Some(sections), None, None)))
}

/// Move one section to a new position
#[utoipa::path(
    post,
    path = "/api/websites/{id}/sections/move",
    params(
        ("id" = Uuid, Path, description = "Website ID")
    ),
    request_body = MoveSectionDto,
    responses(
        (status = 200, description = "Sections reordered", body = ApiResponse<Vec<SectionEntry>>),
        (status = 400, description = "Index out of range"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website not found")
    ),
    security(("bearer_auth" = [])),
    tag = "sections"
)]
pub async fn move_section(
    user: AuthenticatedUser,
    State(service): State<Arc<WebsiteService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<MoveSectionDto>,
) -> Result<Json<ApiResponse<Vec<SectionEntry>>>> {
    let sections = service
        .move_section(&user, id, dto.from_index, dto.to_index)
        .await?;
    Ok(Json(ApiResponse::success(Some(sections), None, None)))
}

/// Show or hide a section
#[utoipa::path(
    post,
    path = "/api/websites/{id}/sections/{section_id}/visibility",
    params(
        ("id" = Uuid, Path, description = "Website ID"),
        ("section_id" = String, Path, description = "Section kind, e.g. menu")
    ),
    request_body = SectionVisibilityDto,
    responses(
        (status = 200, description = "Visibility updated", body = ApiResponse<Vec<SectionEntry>>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website or section not found")
    ),
    security(("bearer_auth" = [])),
    tag = "sections"
)]
pub async fn set_section_visibility(
    user: AuthenticatedUser,
    State(service): State<Arc<WebsiteService>>,
    Path((id, section_id)): Path<(Uuid, String)>,
    ValidatedJson(dto): ValidatedJson<SectionVisibilityDto>,
) -> Result<Json<ApiResponse<Vec<SectionEntry>>>> {
    let sections = service
        .set_section_visibility(&user, id, &section_id, dto.visible)
        .await?;
    Ok(Json(ApiResponse::success(Some(sections), None, None)))
}
