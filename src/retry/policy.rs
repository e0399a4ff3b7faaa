//! Bounded retry with backoff and cancellation

use crate::error::{Error, Result};
use crate::types::BackoffType;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Retry policy applied to page fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_type: BackoffType,
    initial_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_type: BackoffType::Constant,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Create a new policy builder
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Policy that makes a single attempt
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Total attempts, including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let step = attempt.max(1);
        let delay = match self.backoff_type {
            BackoffType::Constant => self.initial_delay,
            BackoffType::Linear => self.initial_delay.saturating_mul(step),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(step - 1);
                self.initial_delay.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.max_delay)
    }

    /// Run `operation` until it succeeds, fails permanently, or the attempt
    /// budget is spent.
    ///
    /// The closure receives the 1-based attempt number. A cancellation, either
    /// reported by the operation or observed on `cancel` while waiting between
    /// attempts, ends the chain at once with [`Error::Cancelled`].
    pub async fn run<T, F, Fut>(&self, cancel: &CancellationToken, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let err = match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("Succeeded on attempt {}/{}", attempt, max_attempts);
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            if err.is_cancelled() {
                return Err(err);
            }

            if !err.is_retryable() || attempt >= max_attempts {
                warn!(
                    "Giving up after attempt {}/{}: {}",
                    attempt, max_attempts, err
                );
                return Err(err);
            }

            let delay = self.delay_for(attempt);
            warn!(
                "Attempt {}/{} failed: {}, retrying in {:?}",
                attempt, max_attempts, err, delay
            );

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(Error::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }
}

/// Builder for retry policies
#[derive(Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    /// Set total attempts, including the first
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.policy.max_attempts = attempts;
        self
    }

    /// Set a fixed delay between attempts
    pub fn delay(mut self, delay: Duration) -> Self {
        self.policy.backoff_type = BackoffType::Constant;
        self.policy.initial_delay = delay;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.policy.backoff_type = backoff_type;
        self.policy.initial_delay = initial;
        self.policy.max_delay = max;
        self
    }

    /// Build the policy
    pub fn build(self) -> RetryPolicy {
        self.policy
    }
}
