use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::task::JoinHandle;

use crate::core::config::{RateLimitConfig, RateLimitStoreKind};
use crate::features::rate_limits::models::{RateLimitResult, WindowCounter};
use crate::features::rate_limits::services::{
    MemoryRateLimitStore, PostgresRateLimitStore, RateLimitStore, RateLimitStoreError,
};

/// Fixed-window rate limiter over a pluggable counter store
pub struct RateLimitService {
    store: Arc<dyn RateLimitStore>,
    max_requests: u32,
    window: chrono::Duration,
}

impl RateLimitService {
    pub fn new(
        store: Arc<dyn RateLimitStore>,
        max_requests: u32,
        window: std::time::Duration,
    ) -> Self {
        Self {
            store,
            max_requests,
            window: chrono::Duration::from_std(window)
                .unwrap_or_else(|_| chrono::Duration::days(1)),
        }
    }

    pub fn from_config(config: &RateLimitConfig, pool: PgPool) -> Self {
        let store: Arc<dyn RateLimitStore> = match config.store {
            RateLimitStoreKind::Memory => Arc::new(MemoryRateLimitStore::new()),
            RateLimitStoreKind::Postgres => Arc::new(PostgresRateLimitStore::new(pool)),
        };
        Self::new(store, config.max_requests, config.window)
    }

    /// Count a request for `key` and decide whether it may proceed
    pub async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitStoreError> {
        self.check_at(key, Utc::now()).await
    }

    pub async fn check_at(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<RateLimitResult, RateLimitStoreError> {
        let counter = self.store.hit(key, self.window, now).await?;
        Ok(RateLimitResult::from_counter(counter, self.max_requests))
    }

    /// Report where `key` stands without counting a request.
    ///
    /// `allowed` here answers "would the next request pass".
    pub async fn status(&self, key: &str) -> Result<RateLimitResult, RateLimitStoreError> {
        self.status_at(key, Utc::now()).await
    }

    pub async fn status_at(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<RateLimitResult, RateLimitStoreError> {
        let counter = self
            .store
            .peek(key, now)
            .await?
            .unwrap_or(WindowCounter {
                count: 0,
                reset_at: now + self.window,
            });

        Ok(RateLimitResult {
            allowed: counter.count < self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(counter.count),
            reset_at: counter.reset_at,
        })
    }

    pub async fn purge_expired(&self) -> Result<u64, RateLimitStoreError> {
        self.store.purge_expired(Utc::now()).await
    }

    /// Periodically clear expired counters, once per window
    pub fn spawn_purge_task(self: Arc<Self>) -> JoinHandle<()> {
        let period = self
            .window
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(60));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                match self.purge_expired().await {
                    Ok(0) => {}
                    Ok(removed) => tracing::debug!("Purged {} expired rate limit counters", removed),
                    Err(e) => tracing::warn!("Failed to purge rate limit counters: {}", e),
                }
            }
        })
    }
}
