use chrono::{DateTime, Utc};

/// Request count for one key inside its current fixed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCounter {
    pub count: u32,
    pub reset_at: DateTime<Utc>,
}

impl WindowCounter {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.reset_at
    }
}

/// Outcome of a single rate limit check; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitResult {
    pub fn from_counter(counter: WindowCounter, limit: u32) -> Self {
        Self {
            allowed: counter.count <= limit,
            limit,
            remaining: limit.saturating_sub(counter.count),
            reset_at: counter.reset_at,
        }
    }

    /// Seconds until the window resets, at least 1
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.reset_at - now).num_seconds().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_from_counter() {
        let reset_at = Utc::now();
        let at_limit = RateLimitResult::from_counter(WindowCounter { count: 5, reset_at }, 5);
        assert!(at_limit.allowed);
        assert_eq!(at_limit.remaining, 0);

        let over = RateLimitResult::from_counter(WindowCounter { count: 6, reset_at }, 5);
        assert!(!over.allowed);
        assert_eq!(over.remaining, 0);
    }

    #[test]
    fn test_retry_after_never_zero() {
        let now = Utc::now();
        let result = RateLimitResult {
            allowed: false,
            limit: 1,
            remaining: 0,
            reset_at: now + Duration::seconds(30),
        };
        assert_eq!(result.retry_after_secs(now), 30);
        assert_eq!(result.retry_after_secs(now + Duration::seconds(45)), 1);
    }
}
