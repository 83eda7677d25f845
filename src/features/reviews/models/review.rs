use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Customer review; hidden from the public site until the owner publishes it
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub website_id: Uuid,
    pub author_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}
