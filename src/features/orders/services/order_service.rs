use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::orders::dtos::{
    CreateOrderDto, OrderDetailResponseDto, OrderResponseDto,
};
use crate::features::orders::models::{Order, OrderItem, OrderStatus};
use crate::features::websites::services::{fetch_active_website, fetch_owned_website};

pub struct OrderService {
    pool: PgPool,
}

impl OrderService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Place an order with its items in one transaction
    pub async fn create(&self, website_id: Uuid, dto: CreateOrderDto) -> Result<OrderDetailResponseDto> {
        let total = dto
            .total()
            .ok_or_else(|| AppError::Validation("Order total is out of range".to_string()))?;

        fetch_active_website(&self.pool, website_id).await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (website_id, customer_name, customer_email, customer_phone, total, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(website_id)
        .bind(&dto.customer_name)
        .bind(&dto.customer_email)
        .bind(&dto.customer_phone)
        .bind(total)
        .bind(&dto.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create order: {:?}", e);
            AppError::Database(e)
        })?;

        let mut items = Vec::with_capacity(dto.items.len());
        for (position, item) in dto.items.iter().enumerate() {
            let saved = sqlx::query_as::<_, OrderItem>(
                r#"
                INSERT INTO order_items (order_id, position, name, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(order.id)
            .bind(position as i32)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create order item: {:?}", e);
                AppError::Database(e)
            })?;
            items.push(saved.into());
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Order created: id={}, website_id={}, items={}, total={}",
            order.id,
            website_id,
            items.len(),
            order.total
        );

        Ok(OrderDetailResponseDto {
            order: order.into(),
            items,
        })
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        website_id: Uuid,
        status: Option<OrderStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<OrderResponseDto>, i64)> {
        fetch_owned_website(&self.pool, user, website_id).await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE website_id = $1 AND ($2::order_status IS NULL OR status = $2)",
        )
        .bind(website_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count orders: {:?}", e);
            AppError::Database(e)
        })?;

        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE website_id = $1 AND ($2::order_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(website_id)
        .bind(status)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list orders: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((orders.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get(
        &self,
        user: &AuthenticatedUser,
        website_id: Uuid,
        order_id: Uuid,
    ) -> Result<OrderDetailResponseDto> {
        fetch_owned_website(&self.pool, user, website_id).await?;

        let order = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE id = $1 AND website_id = $2",
        )
        .bind(order_id)
        .bind(website_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get order: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Order '{}' not found", order_id)))?;

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY position",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get order items: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(OrderDetailResponseDto {
            order: order.into(),
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    pub async fn update_status(
        &self,
        user: &AuthenticatedUser,
        website_id: Uuid,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<OrderResponseDto> {
        fetch_owned_website(&self.pool, user, website_id).await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let current = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE id = $1 AND website_id = $2 FOR UPDATE",
        )
        .bind(order_id)
        .bind(website_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get order: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Order '{}' not found", order_id)))?;

        if !current.status.can_transition_to(status) {
            return Err(AppError::BadRequest(format!(
                "Cannot change order from {} to {}",
                current.status, status
            )));
        }

        let order = sqlx::query_as::<_, Order>(
            "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(order_id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update order status: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Order status updated: id={}, {} -> {} by {}",
            order_id,
            current.status,
            status,
            user.user_id
        );

        Ok(order.into())
    }
}
