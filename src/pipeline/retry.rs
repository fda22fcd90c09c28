use crate::common::constants::{BASE_BACKOFF, MAX_RETRIES};
use crate::config::RetryConfig;
use std::time::Duration;

/// Bounded retry policy for throttled (429) responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per identifier, including the first request
    pub max_attempts: u32,
    /// Base of the exponential backoff, in seconds
    pub base_backoff: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_backoff: BASE_BACKOFF,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_backoff: config.base_backoff,
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt after a 429 on zero-based `attempt`.
    ///
    /// A usable `Retry-After` value wins over the computed `base^attempt`.
    pub fn backoff_for(&self, attempt: u32, retry_after: Option<&str>) -> Duration {
        match retry_after.and_then(parse_retry_after) {
            Some(secs) => Duration::from_secs(secs),
            None => Duration::from_secs(self.exponential_secs(attempt)),
        }
    }

    fn exponential_secs(&self, attempt: u32) -> u64 {
        self.base_backoff.checked_pow(attempt).unwrap_or(u64::MAX)
    }
}

/// `Retry-After` in delta-seconds form. HTTP-date values are not supported.
pub fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}
