//! Bounded retry with exponential backoff for transient overload.
//!
//! Only `AppError::Overloaded` is retried here. Parse failures get their own
//! bounded budget in the dispatch layer, and safety blocks are never retried.

use std::future::Future;
use std::time::Duration;

use localfind_core::AppResult;
use rand::Rng;

/// Retry policy for transient endpoint overload.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Base delay; attempt `n` waits `base * 2^n` plus jitter
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy from configured values.
    pub fn new(max_attempts: u32, initial_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::from_millis(initial_delay_ms),
        }
    }

    /// Delay before the retry following `attempt` (zero-based), with up to
    /// one second of random jitter to spread out synchronized clients.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.initial_delay * 2u32.saturating_pow(attempt);
        let jitter = Duration::from_millis(rand::rng().random_range(0..1000));
        base + jitter
    }

    /// Run `operation`, retrying overload errors until the attempt budget is
    /// spent. Any other error is returned immediately.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 0u32;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_overloaded() && attempt + 1 < self.max_attempts => {
                    let delay = self.backoff_delay(attempt);
                    tracing::warn!(
                        "Model overloaded (attempt {}/{}). Retrying in {:.1}s...",
                        attempt + 1,
                        self.max_attempts,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
