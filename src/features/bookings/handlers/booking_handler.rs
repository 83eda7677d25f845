use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ValidatedJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::bookings::dtos::{
    BookingListQuery, BookingResponseDto, CreateBookingDto, UpdateBookingStatusDto,
};
use crate::features::bookings::services::{BookingFilter, BookingService};
use crate::features::websites::services::parse_site_id;
use crate::shared::types::{ApiResponse, Meta};
use crate::shared::validation::parse_date;

/// Submit a booking request from a tenant site
#[utoipa::path(
    post,
    path = "/api/public/sites/{site}/bookings",
    params(
        ("site" = Uuid, Path, description = "Website ID")
    ),
    request_body = CreateBookingDto,
    responses(
        (status = 201, description = "Booking received", body = ApiResponse<BookingResponseDto>),
        (status = 400, description = "Validation error or date in the past"),
        (status = 404, description = "Website not found"),
        (status = 429, description = "Rate limit exceeded")
    ),
    tag = "bookings"
)]
pub async fn create_booking(
    State(service): State<Arc<BookingService>>,
    Path(site): Path<String>,
    ValidatedJson(dto): ValidatedJson<CreateBookingDto>,
) -> Result<(StatusCode, Json<ApiResponse<BookingResponseDto>>)> {
    let website_id = parse_site_id(&site)?;
    let booking = service.create(website_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(booking),
            Some("Booking received".to_string()),
            None,
        )),
    ))
}

/// List a website's bookings
#[utoipa::path(
    get,
    path = "/api/websites/{id}/bookings",
    params(
        ("id" = Uuid, Path, description = "Website ID"),
        BookingListQuery
    ),
    responses(
        (status = 200, description = "Bookings ordered by slot", body = ApiResponse<Vec<BookingResponseDto>>),
        (status = 400, description = "Invalid date filter"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website not found")
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn list_bookings(
    user: AuthenticatedUser,
    State(service): State<Arc<BookingService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<ApiResponse<Vec<BookingResponseDto>>>> {
    let date = match query.date.as_deref() {
        Some(raw) => Some(
            parse_date(raw)
                .ok_or_else(|| AppError::Validation(format!("Invalid date filter '{}'", raw)))?,
        ),
        None => None,
    };
    let filter = BookingFilter {
        status: query.status,
        date,
    };
    let pagination = query.pagination();

    let (bookings, total) = service
        .list(&user, id, filter, pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(bookings),
        None,
        Some(Meta::total(total)),
    )))
}

/// Confirm, cancel or complete a booking
#[utoipa::path(
    patch,
    path = "/api/websites/{id}/bookings/{booking_id}/status",
    params(
        ("id" = Uuid, Path, description = "Website ID"),
        ("booking_id" = Uuid, Path, description = "Booking ID")
    ),
    request_body = UpdateBookingStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<BookingResponseDto>),
        (status = 400, description = "Transition not allowed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website or booking not found")
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn update_booking_status(
    user: AuthenticatedUser,
    State(service): State<Arc<BookingService>>,
    Path((id, booking_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateBookingStatusDto>,
) -> Result<Json<ApiResponse<BookingResponseDto>>> {
    let booking = service
        .update_status(&user, id, booking_id, dto.status)
        .await?;
    Ok(Json(ApiResponse::success(Some(booking), None, None)))
}
