//! Bounded retry with exponential backoff and per-attempt timeouts.
//!
//! [`run_with_retry`] executes a fallible operation up to
//! [`RetryPolicy::max_attempts`] times. Each attempt runs as its own task
//! under [`RetryPolicy::attempt_timeout`]; when the timeout fires the waiter
//! gives up and the attempt is recorded as failed, but the task itself is
//! not interrupted — it runs to its own completion in the background. This
//! trades prompt resource reclamation for simplicity: the external call
//! cannot be cancelled reliably anyway.
//!
//! Backoff sleeping happens in the caller's task, between attempts. Whether
//! the caller holds an admission ticket across those sleeps is the caller's
//! decision; the admission timeout used elsewhere must budget for the worst
//! case ([`RetryPolicy::worst_case`]).

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{AttemptError, RetryError, RetryResult};

// =============================================================================
// Policy
// =============================================================================

/// Retry schedule: attempt count, exponential backoff, per-attempt timeout.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. Clamped to at least 1.
    pub max_attempts: u32,
    /// Delay before the second attempt; later delays grow by `multiplier`.
    pub base_delay: Duration,
    /// Exponential backoff multiplier.
    pub multiplier: f64,
    /// Hard wall-clock bound on each individual attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(800),
            multiplier: 1.6,
            attempt_timeout: Duration::from_secs(20),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay slept after attempt `attempt` (1-based):
    /// `base_delay * multiplier^(attempt-1)`, saturating at
    /// [`Duration::MAX`] instead of panicking on overflow.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt.saturating_sub(1) as i32);
        Duration::try_from_secs_f64(self.base_delay.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX)
    }

    /// Total backoff slept when every attempt fails.
    pub fn backoff_total(&self) -> Duration {
        (1..self.max_attempts.max(1))
            .map(|attempt| self.delay_after(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Worst-case wall clock for a fully exhausted run: every attempt hits
    /// its timeout plus all backoff sleeps. Saturates at [`Duration::MAX`].
    pub fn worst_case(&self) -> Duration {
        self.attempt_timeout
            .saturating_mul(self.max_attempts.max(1))
            .saturating_add(self.backoff_total())
    }
}

// =============================================================================
// Executor
// =============================================================================

/// Runs `op` under `policy`, returning the first success.
///
/// `op` receives the 1-based attempt number and must produce a future that
/// is `'static`: attempts are spawned so a timed-out attempt can keep
/// running detached while the next one is scheduled.
///
/// A panicking attempt is recorded as a failed attempt, not propagated.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> RetryResult<T>
where
    T: Send + 'static,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError>> + Send + 'static,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last = AttemptError::Failed("no attempts were made".to_string());

    for attempt in 1..=max_attempts {
        let task = tokio::spawn(op(attempt));
        match tokio::time::timeout(policy.attempt_timeout, task).await {
            Ok(Ok(Ok(value))) => {
                if attempt > 1 {
                    debug!(attempt, "operation succeeded after retrying");
                }
                return Ok(value);
            }
            Ok(Ok(Err(err))) => {
                debug!(attempt, error = %err, "attempt failed");
                last = err;
            }
            Ok(Err(join_err)) => {
                warn!(attempt, error = %join_err, "attempt panicked");
                last = AttemptError::Failed(format!("attempt panicked: {join_err}"));
            }
            Err(_) => {
                warn!(attempt, timeout = ?policy.attempt_timeout, "attempt timed out");
                last = AttemptError::Timeout {
                    timeout: policy.attempt_timeout,
                };
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(policy.delay_after(attempt)).await;
        }
    }

    Err(RetryError {
        attempts: max_attempts,
        last,
    })
}
