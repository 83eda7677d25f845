use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reviews::dtos::{CreateReviewDto, PublicReviewDto, ReviewResponseDto};
use crate::features::reviews::models::Review;
use crate::features::websites::services::{fetch_active_website, fetch_owned_website};

/// Aggregate over a site's published reviews
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReviewStats {
    pub total: i64,
    /// None when nothing is published yet
    pub average_rating: Option<f64>,
}

pub struct ReviewService {
    pool: PgPool,
}

impl ReviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a public review; it stays unpublished until the owner approves it
    pub async fn create(&self, website_id: Uuid, dto: CreateReviewDto) -> Result<PublicReviewDto> {
        fetch_active_website(&self.pool, website_id).await?;

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (website_id, author_name, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(website_id)
        .bind(&dto.author_name)
        .bind(dto.rating)
        .bind(&dto.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create review: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Review submitted: id={}, website_id={}, rating={}",
            review.id,
            website_id,
            review.rating
        );

        Ok(review.into())
    }

    /// Published reviews for the public site, newest first
    pub async fn list_published(
        &self,
        website_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<PublicReviewDto>, ReviewStats)> {
        fetch_active_website(&self.pool, website_id).await?;

        let stats = sqlx::query_as::<_, ReviewStats>(
            r#"
            SELECT COUNT(*) AS total,
                   ROUND(AVG(rating)::numeric, 2)::float8 AS average_rating
            FROM reviews
            WHERE website_id = $1 AND is_published = TRUE
            "#,
        )
        .bind(website_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to aggregate reviews: {:?}", e);
            AppError::Database(e)
        })?;

        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE website_id = $1 AND is_published = TRUE
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(website_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list published reviews: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((reviews.into_iter().map(Into::into).collect(), stats))
    }

    /// Every review of a site, for moderation
    pub async fn list_for_owner(
        &self,
        user: &AuthenticatedUser,
        website_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ReviewResponseDto>, i64)> {
        fetch_owned_website(&self.pool, user, website_id).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE website_id = $1")
            .bind(website_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count reviews: {:?}", e);
                AppError::Database(e)
            })?;

        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE website_id = $1 ORDER BY created_at DESC OFFSET $2 LIMIT $3",
        )
        .bind(website_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reviews: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((reviews.into_iter().map(Into::into).collect(), total))
    }

    pub async fn set_published(
        &self,
        user: &AuthenticatedUser,
        website_id: Uuid,
        review_id: Uuid,
        is_published: bool,
    ) -> Result<ReviewResponseDto> {
        fetch_owned_website(&self.pool, user, website_id).await?;

        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews SET is_published = $3
            WHERE id = $1 AND website_id = $2
            RETURNING *
            "#,
        )
        .bind(review_id)
        .bind(website_id)
        .bind(is_published)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update review: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Review '{}' not found", review_id)))?;

        tracing::info!(
            "Review {}: id={} by {}",
            if is_published { "published" } else { "hidden" },
            review_id,
            user.user_id
        );

        Ok(review.into())
    }
}
