use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use thiserror::Error;

use crate::core::error::AppError;
use crate::features::rate_limits::models::WindowCounter;

#[derive(Debug, Error)]
pub enum RateLimitStoreError {
    #[error("Rate limit store database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Rate limit store lock poisoned")]
    Poisoned,
}

impl From<RateLimitStoreError> for AppError {
    fn from(e: RateLimitStoreError) -> Self {
        match e {
            RateLimitStoreError::Database(e) => AppError::Database(e),
            RateLimitStoreError::Poisoned => AppError::Internal(e.to_string()),
        }
    }
}

/// Backing storage for fixed-window counters.
///
/// Implementations must make `hit` atomic per key: two concurrent hits on the same key
/// never observe the same count.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count one request for `key`, opening a fresh window when the current one is absent
    /// or expired at `now`
    async fn hit(
        &self,
        key: &str,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Result<WindowCounter, RateLimitStoreError>;

    /// Current counter for `key` without counting; `None` when absent or expired
    async fn peek(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<WindowCounter>, RateLimitStoreError>;

    /// Drop every counter whose window has ended; returns how many were removed
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RateLimitStoreError>;
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// Process-local store; counters are not shared between instances
#[derive(Default)]
pub struct MemoryRateLimitStore {
    buckets: Mutex<HashMap<String, WindowCounter>>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.buckets.lock().map(|b| b.len()).unwrap_or(0)
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn hit(
        &self,
        key: &str,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Result<WindowCounter, RateLimitStoreError> {
        let mut buckets = self
            .buckets
            .lock()
            .map_err(|_| RateLimitStoreError::Poisoned)?;

        let fresh = WindowCounter {
            count: 0,
            reset_at: now + window,
        };
        let bucket = buckets.entry(key.to_string()).or_insert(fresh);
        if bucket.is_expired(now) {
            *bucket = fresh;
        }
        bucket.count = bucket.count.saturating_add(1);

        Ok(*bucket)
    }

    async fn peek(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<WindowCounter>, RateLimitStoreError> {
        let buckets = self
            .buckets
            .lock()
            .map_err(|_| RateLimitStoreError::Poisoned)?;

        Ok(buckets.get(key).filter(|b| !b.is_expired(now)).copied())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RateLimitStoreError> {
        let mut buckets = self
            .buckets
            .lock()
            .map_err(|_| RateLimitStoreError::Poisoned)?;

        let before = buckets.len();
        buckets.retain(|_, bucket| !bucket.is_expired(now));
        Ok((before - buckets.len()) as u64)
    }
}

// =============================================================================
// POSTGRES
// =============================================================================

/// Store shared by every instance pointed at the same database
pub struct PostgresRateLimitStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct CounterRow {
    count: i32,
    reset_at: DateTime<Utc>,
}

impl From<CounterRow> for WindowCounter {
    fn from(row: CounterRow) -> Self {
        Self {
            count: u32::try_from(row.count).unwrap_or(0),
            reset_at: row.reset_at,
        }
    }
}

impl PostgresRateLimitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateLimitStore for PostgresRateLimitStore {
    async fn hit(
        &self,
        key: &str,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Result<WindowCounter, RateLimitStoreError> {
        // Single upsert so concurrent instances cannot lose increments
        let row = sqlx::query_as::<_, CounterRow>(
            r#"
            INSERT INTO rate_limit_counters (key, count, reset_at)
            VALUES ($1, 1, $3)
            ON CONFLICT (key) DO UPDATE SET
                count = CASE
                    WHEN rate_limit_counters.reset_at <= $2 THEN 1
                    ELSE rate_limit_counters.count + 1
                END,
                reset_at = CASE
                    WHEN rate_limit_counters.reset_at <= $2 THEN $3
                    ELSE rate_limit_counters.reset_at
                END
            RETURNING count, reset_at
            "#,
        )
        .bind(key)
        .bind(now)
        .bind(now + window)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn peek(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<WindowCounter>, RateLimitStoreError> {
        let row = sqlx::query_as::<_, CounterRow>(
            r#"
            SELECT count, reset_at
            FROM rate_limit_counters
            WHERE key = $1 AND reset_at > $2
            "#,
        )
        .bind(key)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RateLimitStoreError> {
        let result = sqlx::query("DELETE FROM rate_limit_counters WHERE reset_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_hit_counts_within_window() {
        let store = MemoryRateLimitStore::new();
        let now = Utc::now();
        let window = Duration::seconds(60);

        let first = store.hit("1.2.3.4", window, now).await.unwrap();
        let second = store
            .hit("1.2.3.4", window, now + Duration::seconds(10))
            .await
            .unwrap();

        assert_eq!(first.count, 1);
        assert_eq!(second.count, 2);
        assert_eq!(second.reset_at, now + window);
    }

    #[tokio::test]
    async fn test_memory_window_resets_on_expiry() {
        let store = MemoryRateLimitStore::new();
        let now = Utc::now();
        let window = Duration::seconds(60);

        store.hit("k", window, now).await.unwrap();
        store.hit("k", window, now).await.unwrap();

        let later = now + window;
        let counter = store.hit("k", window, later).await.unwrap();
        assert_eq!(counter.count, 1);
        assert_eq!(counter.reset_at, later + window);
    }

    #[tokio::test]
    async fn test_memory_peek_and_purge() {
        let store = MemoryRateLimitStore::new();
        let now = Utc::now();

        store.hit("short", Duration::seconds(1), now).await.unwrap();
        store.hit("long", Duration::seconds(60), now).await.unwrap();
        assert_eq!(store.len(), 2);

        let later = now + Duration::seconds(5);
        assert!(store.peek("short", later).await.unwrap().is_none());
        assert_eq!(store.peek("long", later).await.unwrap().unwrap().count, 1);

        assert_eq!(store.purge_expired(later).await.unwrap(), 1);
        assert_eq!(store.len(), 1);
    }
}
