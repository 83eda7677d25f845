use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::bookings::models::{Booking, BookingStatus};
use crate::shared::types::{default_page, default_page_size, PaginationQuery};
use crate::shared::validation::{validate_date, validate_time, PHONE_REGEX};

/// Public booking request submitted from a tenant site
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBookingDto {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub customer_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub customer_email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub customer_phone: Option<String>,

    #[validate(length(max = 120, message = "Service must not exceed 120 characters"))]
    pub service: Option<String>,

    /// YYYY-MM-DD, today or later
    #[validate(custom(function = "validate_date"))]
    pub booking_date: String,

    /// HH:MM or HH:MM:SS, 24h
    #[validate(custom(function = "validate_time"))]
    pub booking_time: String,

    #[validate(range(min = 1, max = 50, message = "Party size must be between 1 and 50"))]
    pub party_size: i32,

    #[validate(length(max = 1000, message = "Notes must not exceed 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingStatusDto {
    pub status: BookingStatus,
}

/// Owner listing filters
///
/// Pagination fields are inlined because query strings cannot be flattened with
/// numeric fields.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct BookingListQuery {
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    pub status: Option<BookingStatus>,

    /// Only bookings on this day (YYYY-MM-DD)
    pub date: Option<String>,
}

impl BookingListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingResponseDto {
    pub id: Uuid,
    pub website_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub service: Option<String>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub party_size: i32,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponseDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            website_id: b.website_id,
            customer_name: b.customer_name,
            customer_email: b.customer_email,
            customer_phone: b.customer_phone,
            service: b.service,
            booking_date: b.booking_date,
            booking_time: b.booking_time,
            party_size: b.party_size,
            notes: b.notes,
            status: b.status,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}
