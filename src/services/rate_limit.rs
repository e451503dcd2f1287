// src/services/rate_limit.rs
// DOCUMENTATION: Per-device write throttling
// PURPOSE: Keep a single device from flooding reviews, votes, reports or contact messages

use crate::errors::AppError;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Keyed limiter shared by every write endpoint
pub struct WriteLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl WriteLimiter {
    pub fn per_minute(requests: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Consume one cell for `key`
    pub fn check(&self, key: &str) -> Result<(), AppError> {
        self.limiter.check_key(&key.to_string()).map_err(|_| {
            log::warn!("Write rate limit exceeded for {}", key);
            AppError::RateLimitExceeded
        })
    }

    /// Drop state for keys that are back at full capacity
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }
}

pub fn start_prune_task(limiter: Arc<WriteLimiter>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));
        loop {
            interval.tick().await;
            limiter.prune();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_per_key() {
        let limiter = WriteLimiter::per_minute(2);

        assert!(limiter.check("device-a").is_ok());
        assert!(limiter.check("device-a").is_ok());
        assert!(matches!(
            limiter.check("device-a"),
            Err(AppError::RateLimitExceeded)
        ));

        assert!(limiter.check("device-b").is_ok());
    }

    #[test]
    fn test_zero_quota_falls_back_to_one() {
        let limiter = WriteLimiter::per_minute(0);
        assert!(limiter.check("x").is_ok());
        assert!(limiter.check("x").is_err());
    }
}
