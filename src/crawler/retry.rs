//! Retry with exponential backoff
//!
//! `Retrying` wraps any [`StatusCheck`] and is itself a `StatusCheck`, so a
//! retrying checker drops in wherever a plain one is accepted.

use crate::config::RetryConfig;
use crate::crawler::checker::StatusCheck;
use crate::state::LinkStatus;
use async_trait::async_trait;
use std::time::Duration;

/// Bounded exponential backoff
///
/// The wait after attempt `n` (1-based) is
/// `clamp(multiplier * 2^(n-1), min_wait, max_wait)` time units. With the
/// defaults (1, 4, 20, one second) the waits are 4s, 4s, 4s, 8s.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub multiplier: f64,
    pub min_wait: f64,
    pub max_wait: f64,
    pub time_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            multiplier: config.multiplier,
            min_wait: config.min_wait,
            max_wait: config.max_wait,
            time_unit: Duration::from_millis(config.time_unit_ms),
        }
    }

    /// Wait before the attempt following `attempt`
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(63) as i32;
        let units = (self.multiplier * 2f64.powi(exponent))
            .min(self.max_wait)
            .max(self.min_wait)
            .max(0.0);
        self.time_unit.mul_f64(units)
    }
}

/// A status check that retries transient failures
pub struct Retrying<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: StatusCheck> Retrying<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<C: StatusCheck> StatusCheck for Retrying<C> {
    /// Returns the first non-transient outcome, or the last failure once
    /// attempts run out
    async fn check(&self, url: &str) -> LinkStatus {
        let mut attempt = 1;

        loop {
            let status = self.inner.check(url).await;

            if !status.outcome.is_transient() {
                return status;
            }

            if attempt >= self.policy.max_attempts {
                tracing::warn!(
                    "Giving up on {} after {} attempts: {}",
                    url,
                    attempt,
                    status.outcome
                );
                return status;
            }

            let delay = self.policy.delay_after(attempt);
            tracing::warn!(
                "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                attempt,
                self.policy.max_attempts,
                url,
                status.outcome,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
