//! Exponential-backoff retry for classified GitHub failures.

use crate::error::GithubClientError;

use std::future::Future;
use std::time::Duration;

use backoff::{ExponentialBackoff, backoff::Backoff};
use log::{debug, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1_000);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);
const BACKOFF_MULTIPLIER: f64 = 2.0;

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each retry after that.
    pub base_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Deterministic (jitter-free) exponential schedule with no elapsed-time cap.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.base_delay,
            initial_interval: self.base_delay,
            randomization_factor: 0.0,
            multiplier: BACKOFF_MULTIPLIER,
            max_interval: self.max_delay,
            max_elapsed_time: None,
            ..Default::default()
        }
    }

    /// Every delay this policy would sleep if all attempts failed.
    pub fn delays(&self) -> Vec<Duration> {
        let mut backoff = self.backoff();
        (1..self.max_attempts.max(1))
            .map(|_| backoff.next_backoff().unwrap_or(self.max_delay))
            .collect()
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// runs out of attempts. `sleep` is awaited before each retry, never before
/// the first attempt; the last error is returned when attempts run out.
///
/// `operation` receives the 1-based attempt number.
pub async fn retry_classified<T, Op, Fut, Sleep, SleepFut>(
    policy: &RetryPolicy,
    mut operation: Op,
    mut sleep: Sleep,
) -> Result<T, GithubClientError>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, GithubClientError>>,
    Sleep: FnMut(Duration) -> SleepFut,
    SleepFut: Future<Output = ()>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = policy.backoff();
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("Request succeeded on attempt {attempt}/{max_attempts}");
                }
                return Ok(value);
            }
            Err(error) if attempt < max_attempts && error.is_retryable() => {
                let delay = backoff.next_backoff().unwrap_or(policy.max_delay);
                warn!(
                    "Attempt {attempt}/{max_attempts} failed ({}, status {}), retrying after {delay:?}",
                    error.error_category(),
                    error.status_code()
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(error) => {
                if error.is_retryable() {
                    warn!("Giving up after {attempt} attempt(s): {error}");
                } else {
                    debug!(
                        "Not retrying {} failure (status {})",
                        error.error_category(),
                        error.status_code()
                    );
                }
                return Err(error);
            }
        }
    }
}
