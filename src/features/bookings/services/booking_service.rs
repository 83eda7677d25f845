use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::bookings::dtos::{BookingResponseDto, CreateBookingDto};
use crate::features::bookings::models::{Booking, BookingStatus};
use crate::features::websites::services::{fetch_active_website, fetch_owned_website};
use crate::shared::validation::{parse_date, parse_time};

/// Parse the requested slot and reject days before `today`
pub fn parse_booking_slot(
    date: &str,
    time: &str,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveTime)> {
    let date = parse_date(date)
        .ok_or_else(|| AppError::Validation("Invalid booking date".to_string()))?;
    let time = parse_time(time)
        .ok_or_else(|| AppError::Validation("Invalid booking time".to_string()))?;

    if date < today {
        return Err(AppError::Validation(
            "Booking date cannot be in the past".to_string(),
        ));
    }

    Ok((date, time))
}

/// Filters for the owner's booking list
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub date: Option<NaiveDate>,
}

pub struct BookingService {
    pool: PgPool,
}

impl BookingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a public booking request; it starts as pending
    pub async fn create(&self, website_id: Uuid, dto: CreateBookingDto) -> Result<BookingResponseDto> {
        let (booking_date, booking_time) = parse_booking_slot(
            &dto.booking_date,
            &dto.booking_time,
            Utc::now().date_naive(),
        )?;

        fetch_active_website(&self.pool, website_id).await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                website_id, customer_name, customer_email, customer_phone, service,
                booking_date, booking_time, party_size, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(website_id)
        .bind(&dto.customer_name)
        .bind(&dto.customer_email)
        .bind(&dto.customer_phone)
        .bind(&dto.service)
        .bind(booking_date)
        .bind(booking_time)
        .bind(dto.party_size)
        .bind(&dto.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create booking: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Booking created: id={}, website_id={}, date={} {}",
            booking.id,
            website_id,
            booking.booking_date,
            booking.booking_time
        );

        Ok(booking.into())
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        website_id: Uuid,
        filter: BookingFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<BookingResponseDto>, i64)> {
        fetch_owned_website(&self.pool, user, website_id).await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE website_id = $1
              AND ($2::booking_status IS NULL OR status = $2)
              AND ($3::date IS NULL OR booking_date = $3)
            "#,
        )
        .bind(website_id)
        .bind(filter.status)
        .bind(filter.date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count bookings: {:?}", e);
            AppError::Database(e)
        })?;

        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE website_id = $1
              AND ($2::booking_status IS NULL OR status = $2)
              AND ($3::date IS NULL OR booking_date = $3)
            ORDER BY booking_date ASC, booking_time ASC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(website_id)
        .bind(filter.status)
        .bind(filter.date)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list bookings: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((bookings.into_iter().map(Into::into).collect(), total))
    }

    pub async fn update_status(
        &self,
        user: &AuthenticatedUser,
        website_id: Uuid,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<BookingResponseDto> {
        fetch_owned_website(&self.pool, user, website_id).await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let current = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE id = $1 AND website_id = $2 FOR UPDATE",
        )
        .bind(booking_id)
        .bind(website_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get booking: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Booking '{}' not found", booking_id)))?;

        if !current.status.can_transition_to(status) {
            return Err(AppError::BadRequest(format!(
                "Cannot change booking from {} to {}",
                current.status, status
            )));
        }

        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(booking_id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update booking status: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Booking status updated: id={}, {} -> {} by {}",
            booking_id,
            current.status,
            status,
            user.user_id
        );

        Ok(booking.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_slot_today_and_future_accepted() {
        let today = day("2026-03-10");
        let (date, time) = parse_booking_slot("2026-03-10", "09:00", today).unwrap();
        assert_eq!(date, today);
        assert_eq!(time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());

        assert!(parse_booking_slot("2026-12-31", "23:59:59", today).is_ok());
    }

    #[test]
    fn test_slot_in_past_rejected() {
        let result = parse_booking_slot("2026-03-09", "09:00", day("2026-03-10"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_slot_malformed_rejected() {
        let today = day("2026-03-10");
        assert!(parse_booking_slot("2026-02-30", "09:00", today).is_err());
        assert!(parse_booking_slot("2026-04-01", "9am", today).is_err());
    }
}
