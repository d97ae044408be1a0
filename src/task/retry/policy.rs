use std::time::Duration;

use crate::error::ValidationError;

/// Retry count meaning "retry forever".
pub const UNLIMITED_RETRIES: i64 = -1;

/// Delay between retries when none is given.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5 * 60);

/// Declared retry behaviour of a task.
///
/// The policy is only read by whatever executes the flow; a task never retries itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: i64,
    retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: i64, retry_delay: Duration) -> Result<Self, ValidationError> {
        if max_retries < UNLIMITED_RETRIES {
            return Err(ValidationError::RetriesOutOfRange(max_retries));
        }
        Ok(Self {
            max_retries,
            retry_delay,
        })
    }

    pub fn unlimited(retry_delay: Duration) -> Self {
        Self {
            max_retries: UNLIMITED_RETRIES,
            retry_delay,
        }
    }

    pub fn with_retry_delay(mut self, value: Duration) -> Self {
        self.retry_delay = value;
        self
    }

    pub fn max_retries(&self) -> i64 {
        self.max_retries
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_retries == UNLIMITED_RETRIES
    }

    /// Whether another attempt is allowed after `retries_used` retries have already run.
    pub fn allows_retry(&self, retries_used: u64) -> bool {
        if self.is_unlimited() {
            return true;
        }
        i64::try_from(retries_used).map_or(false, |used| used < self.max_retries)
    }
}
