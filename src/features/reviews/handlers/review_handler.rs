use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reviews::dtos::{
    CreateReviewDto, PublicReviewDto, PublishReviewDto, ReviewResponseDto,
};
use crate::features::reviews::services::ReviewService;
use crate::features::websites::services::parse_site_id;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Submit a review from a tenant site
#[utoipa::path(
    post,
    path = "/api/public/sites/{site}/reviews",
    params(
        ("site" = Uuid, Path, description = "Website ID")
    ),
    request_body = CreateReviewDto,
    responses(
        (status = 201, description = "Review received, pending moderation", body = ApiResponse<PublicReviewDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Website not found"),
        (status = 429, description = "Rate limit exceeded")
    ),
    tag = "reviews"
)]
pub async fn create_review(
    State(service): State<Arc<ReviewService>>,
    Path(site): Path<String>,
    ValidatedJson(dto): ValidatedJson<CreateReviewDto>,
) -> Result<(StatusCode, Json<ApiResponse<PublicReviewDto>>)> {
    let website_id = parse_site_id(&site)?;
    let review = service.create(website_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(review),
            Some("Thank you! Your review will appear once approved.".to_string()),
            None,
        )),
    ))
}

/// List a site's published reviews
///
/// `meta.average_rating` covers every published review, not just the current page.
#[utoipa::path(
    get,
    path = "/api/public/sites/{site}/reviews",
    params(
        ("site" = Uuid, Path, description = "Website ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Published reviews", body = ApiResponse<Vec<PublicReviewDto>>),
        (status = 404, description = "Website not found")
    ),
    tag = "reviews"
)]
pub async fn list_published_reviews(
    State(service): State<Arc<ReviewService>>,
    Path(site): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<PublicReviewDto>>>> {
    let website_id = parse_site_id(&site)?;
    let (reviews, stats) = service
        .list_published(website_id, pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(reviews),
        None,
        Some(Meta {
            total: stats.total,
            average_rating: stats.average_rating,
        }),
    )))
}

/// List all reviews of a website, published or not
#[utoipa::path(
    get,
    path = "/api/websites/{id}/reviews",
    params(
        ("id" = Uuid, Path, description = "Website ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Reviews", body = ApiResponse<Vec<ReviewResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reviews"
)]
pub async fn list_reviews(
    user: AuthenticatedUser,
    State(service): State<Arc<ReviewService>>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewResponseDto>>>> {
    let (reviews, total) = service
        .list_for_owner(&user, id, pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(reviews),
        None,
        Some(Meta::total(total)),
    )))
}

/// Publish or hide a review
#[utoipa::path(
    patch,
    path = "/api/websites/{id}/reviews/{review_id}",
    params(
        ("id" = Uuid, Path, description = "Website ID"),
        ("review_id" = Uuid, Path, description = "Review ID")
    ),
    request_body = PublishReviewDto,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<ReviewResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website or review not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reviews"
)]
pub async fn publish_review(
    user: AuthenticatedUser,
    State(service): State<Arc<ReviewService>>,
    Path((id, review_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<PublishReviewDto>,
) -> Result<Json<ApiResponse<ReviewResponseDto>>> {
    let review = service
        .set_published(&user, id, review_id, dto.is_published)
        .await?;
    Ok(Json(ApiResponse::success(Some(review), None, None)))
}
