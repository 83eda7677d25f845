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
use crate::features::orders::dtos::{
    CreateOrderDto, OrderDetailResponseDto, OrderListQuery, OrderResponseDto,
    UpdateOrderStatusDto,
};
use crate::features::orders::services::OrderService;
use crate::features::websites::services::parse_site_id;
use crate::shared::types::{ApiResponse, Meta};

/// Place an order from a tenant site
#[utoipa::path(
    post,
    path = "/api/public/sites/{site}/orders",
    params(
        ("site" = Uuid, Path, description = "Website ID")
    ),
    request_body = CreateOrderDto,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderDetailResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Website not found"),
        (status = 429, description = "Rate limit exceeded")
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(service): State<Arc<OrderService>>,
    Path(site): Path<String>,
    ValidatedJson(dto): ValidatedJson<CreateOrderDto>,
) -> Result<(StatusCode, Json<ApiResponse<OrderDetailResponseDto>>)> {
    let website_id = parse_site_id(&site)?;
    let order = service.create(website_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(order),
            Some("Order placed".to_string()),
            None,
        )),
    ))
}

/// List a website's orders, newest first
#[utoipa::path(
    get,
    path = "/api/websites/{id}/orders",
    params(
        ("id" = Uuid, Path, description = "Website ID"),
        OrderListQuery
    ),
    responses(
        (status = 200, description = "Orders", body = ApiResponse<Vec<OrderResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website not found")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn list_orders(
    user: AuthenticatedUser,
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<ApiResponse<Vec<OrderResponseDto>>>> {
    let pagination = query.pagination();
    let (orders, total) = service
        .list(&user, id, query.status, pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(orders),
        None,
        Some(Meta::total(total)),
    )))
}

/// Get an order with its items
#[utoipa::path(
    get,
    path = "/api/websites/{id}/orders/{order_id}",
    params(
        ("id" = Uuid, Path, description = "Website ID"),
        ("order_id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = ApiResponse<OrderDetailResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website or order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_order(
    user: AuthenticatedUser,
    State(service): State<Arc<OrderService>>,
    Path((id, order_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<OrderDetailResponseDto>>> {
    let order = service.get(&user, id, order_id).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}

/// Advance or cancel an order
#[utoipa::path(
    patch,
    path = "/api/websites/{id}/orders/{order_id}/status",
    params(
        ("id" = Uuid, Path, description = "Website ID"),
        ("order_id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Transition not allowed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Website or order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn update_order_status(
    user: AuthenticatedUser,
    State(service): State<Arc<OrderService>>,
    Path((id, order_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(dto): ValidatedJson<UpdateOrderStatusDto>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    let order = service.update_status(&user, id, order_id, dto.status).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}
