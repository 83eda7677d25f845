use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::orders::models::{Order, OrderItem, OrderStatus};
use crate::shared::constants::{MAX_ORDER_AMOUNT, MAX_ORDER_ITEMS};
use crate::shared::types::{default_page, default_page_size, PaginationQuery};
use crate::shared::validation::PHONE_REGEX;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemDto {
    #[validate(length(min = 1, max = 120, message = "Item name must be 1-120 characters"))]
    pub name: String,

    #[validate(range(min = 1, max = 99, message = "Quantity must be between 1 and 99"))]
    pub quantity: i32,

    #[validate(custom(function = "validate_unit_price"))]
    #[schema(value_type = String, example = "12.50")]
    pub unit_price: Decimal,
}

/// Public order placed from a tenant site; the total is computed server-side
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_order_total"))]
pub struct CreateOrderDto {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub customer_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub customer_email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub customer_phone: Option<String>,

    #[validate(length(max = 1000, message = "Notes must not exceed 1000 characters"))]
    pub notes: Option<String>,

    #[validate(custom(function = "validate_item_count"), nested)]
    pub items: Vec<OrderItemDto>,
}

impl CreateOrderDto {
    /// Sum of the line totals, `None` on overflow or past `MAX_ORDER_AMOUNT`
    pub fn total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| {
                item.unit_price
                    .checked_mul(Decimal::from(item.quantity))
                    .and_then(|line| acc.checked_add(line))
            })
            .filter(|total| *total < Decimal::from(MAX_ORDER_AMOUNT))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusDto {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct OrderListQuery {
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    pub status: Option<OrderStatus>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItemResponseDto {
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
}

impl From<OrderItem> for OrderItemResponseDto {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponseDto {
    pub id: Uuid,
    pub website_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub status: OrderStatus,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponseDto {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            website_id: o.website_id,
            customer_name: o.customer_name,
            customer_email: o.customer_email,
            customer_phone: o.customer_phone,
            status: o.status,
            total: o.total,
            notes: o.notes,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetailResponseDto {
    #[serde(flatten)]
    pub order: OrderResponseDto,
    pub items: Vec<OrderItemResponseDto>,
}

fn validate_unit_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("unit_price")
            .with_message("Unit price must not be negative".into()));
    }
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("unit_price")
            .with_message("Unit price must have at most 2 decimal places".into()));
    }
    if *price >= Decimal::from(MAX_ORDER_AMOUNT) {
        return Err(ValidationError::new("unit_price").with_message(
            format!("Unit price must be below {}", MAX_ORDER_AMOUNT).into(),
        ));
    }
    Ok(())
}

fn validate_order_total(dto: &CreateOrderDto) -> Result<(), ValidationError> {
    if dto.total().is_none() {
        return Err(ValidationError::new("total").with_message(
            format!("Order total must be below {}", MAX_ORDER_AMOUNT).into(),
        ));
    }
    Ok(())
}

fn validate_item_count(items: &[OrderItemDto]) -> Result<(), ValidationError> {
    if items.is_empty() || items.len() > MAX_ORDER_ITEMS {
        return Err(ValidationError::new("items").with_message(
            format!("An order must have between 1 and {} items", MAX_ORDER_ITEMS).into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(items: serde_json::Value) -> CreateOrderDto {
        serde_json::from_value(json!({
            "customer_name": "Ana Souza",
            "customer_email": "ana@example.com",
            "items": items,
        }))
        .unwrap()
    }

    #[test]
    fn test_total_is_computed_from_items() {
        let dto = order(json!([
            { "name": "Margherita", "quantity": 2, "unit_price": "11.50" },
            { "name": "Espresso", "quantity": 3, "unit_price": "2.20" },
        ]));
        assert!(dto.validate().is_ok());
        assert_eq!(dto.total(), Some(Decimal::new(2960, 2)));
    }

    #[test]
    fn test_huge_unit_price_is_rejected_without_overflow() {
        let dto = order(json!([
            { "name": "Gold", "quantity": 99, "unit_price": "79228162514264337593543950335" },
        ]));
        assert!(dto.validate().is_err());
        assert_eq!(dto.total(), None);
    }

    #[test]
    fn test_unit_price_precision_and_bound() {
        for price in ["0.005", "99999999999", "10000000000"] {
            let dto = order(json!([{ "name": "Item", "quantity": 1, "unit_price": price }]));
            assert!(dto.validate().is_err(), "{} should be rejected", price);
        }

        let dto = order(json!([{ "name": "Item", "quantity": 1, "unit_price": "9999999999.99" }]));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_total_past_bound_is_rejected() {
        let dto = order(json!([
            { "name": "Item", "quantity": 99, "unit_price": "9999999999.99" },
            { "name": "Item", "quantity": 2, "unit_price": "9999999999.99" },
        ]));
        assert_eq!(dto.total(), None);

        let errors = dto.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn test_order_needs_items() {
        assert!(order(json!([])).validate().is_err());
    }

    #[test]
    fn test_item_rules() {
        for item in [
            json!({ "name": "Margherita", "quantity": 0, "unit_price": "11.50" }),
            json!({ "name": "Margherita", "quantity": 100, "unit_price": "11.50" }),
            json!({ "name": "Margherita", "quantity": 1, "unit_price": "-1" }),
            json!({ "name": "", "quantity": 1, "unit_price": "11.50" }),
        ] {
            assert!(order(json!([item.clone()])).validate().is_err(), "{}", item);
        }
    }

    #[test]
    fn test_too_many_items() {
        let items: Vec<_> = (0..=MAX_ORDER_ITEMS)
            .map(|i| json!({ "name": format!("Item {}", i), "quantity": 1, "unit_price": "1" }))
            .collect();
        assert!(order(json!(items)).validate().is_err());
    }
}
