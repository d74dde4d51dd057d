//! Bounded retry with exponential backoff

use std::{future::Future, time::Duration};

use crate::{
    config::RetryConfig,
    error::{AppError, AppResult},
};

/// Retry policy: attempt cap, base delay doubled after each failed attempt,
/// and a predicate deciding which errors may be retried.
#[derive(Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub retryable: fn(&AppError) -> bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            retryable: AppError::is_retryable,
        }
    }

    /// Delay before the attempt following `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt cap is reached. The last error is returned.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && (self.retryable)(&e) => {
                    let delay = self.delay_after(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        label,
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        RetryPolicy::new(config.max_attempts, Duration::from_millis(config.base_delay_ms))
    }
}
