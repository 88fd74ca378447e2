//! Bounded exponential-backoff retries for provider calls.
//!
//! An error is retried only when it is transient: either the variant says so
//! ([`Error::Transient`]) or its message mentions a network, rate-limit or
//! timeout condition. Everything else fails on the first attempt.
//!
//! The wrapped action may run several times, so it must be safe to repeat.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use docslide_core::defaults::{RETRYABLE_KEYWORDS, RETRY_BASE_DELAY_MS, RETRY_MAX};
use docslide_core::{Error, Result};

/// Retry budget and backoff base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub retries: u32,
    /// Delay before the first retry; doubled for each later retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: RETRY_MAX,
            base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay: Duration) -> Self {
        Self {
            retries,
            base_delay,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay before retry number `retry` (1-based): `base_delay * 2^(retry-1)`.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

/// Whether a failed attempt is worth repeating.
pub fn is_retryable(err: &Error) -> bool {
    if err.is_transient() {
        return true;
    }
    let message = err.to_string().to_lowercase();
    RETRYABLE_KEYWORDS.iter().any(|kw| message.contains(kw))
}

/// Run `operation`, retrying transient failures per `policy`.
///
/// Returns the first success, the first non-retryable error, or the last
/// error once the retry budget is spent.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut failures: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if failures > 0 {
                    debug!(attempt = failures + 1, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                failures += 1;
                if failures > policy.retries || !is_retryable(&err) {
                    return Err(err);
                }
                let delay = policy.backoff(failures);
                warn!(
                    component = "retry",
                    attempt = failures,
                    retries = policy.retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Retrying operation"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
