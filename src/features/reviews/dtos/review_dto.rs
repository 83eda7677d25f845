use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reviews::models::Review;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReviewDto {
    #[validate(length(min = 1, max = 80, message = "Name must be 1-80 characters"))]
    pub author_name: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(max = 2000, message = "Comment must not exceed 2000 characters"))]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PublishReviewDto {
    pub is_published: bool,
}

/// Review as shown to the site owner
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewResponseDto {
    pub id: Uuid,
    pub website_id: Uuid,
    pub author_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponseDto {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            website_id: r.website_id,
            author_name: r.author_name,
            rating: r.rating,
            comment: r.comment,
            is_published: r.is_published,
            created_at: r.created_at,
        }
    }
}

/// Review as rendered on the public site
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicReviewDto {
    pub id: Uuid,
    pub author_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for PublicReviewDto {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            author_name: r.author_name,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rating_range() {
        for (rating, ok) in [(0, false), (1, true), (5, true), (6, false)] {
            let dto: CreateReviewDto = serde_json::from_value(json!({
                "author_name": "Ana",
                "rating": rating,
            }))
            .unwrap();
            assert_eq!(dto.validate().is_ok(), ok, "rating {}", rating);
        }
    }
}
