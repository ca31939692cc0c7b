//! Bounded retry with timeout for external calls
//!
//! Every call to the vector store or the LLM goes through a [`RetryPolicy`].
//! Providers never retry on their own.

use crate::error::ConfigError;
use crate::traits::RetryableError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on `max_retries`
pub const MAX_RETRIES_LIMIT: u32 = 1;

/// Timeout and retry settings for one class of external call
///
/// # Examples
///
/// ```
/// use clubhouse_domain::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.timeout(), Duration::from_secs(30));
/// assert_eq!(policy.max_retries, 1);
/// assert!(policy.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Per-attempt timeout in milliseconds
    /// Default: 30000
    pub timeout_ms: u64,

    /// Retries after the first attempt, at most 1
    /// Default: 1
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds, doubled on each retry
    /// Default: 500
    pub initial_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_retries: 1,
            initial_backoff_ms: 500,
        }
    }
}

/// Failure of a call made under a [`RetryPolicy`]
#[derive(Error, Debug)]
pub enum CallError<E> {
    /// The final attempt did not finish in time
    #[error("call timed out after {0:?}")]
    TimedOut(Duration),

    /// The final attempt failed, or the failure was not transient
    #[error(transparent)]
    Failed(E),
}

impl<E: RetryableError> CallError<E> {
    /// Whether the final failure was transient (timeouts always are)
    pub fn is_transient(&self) -> bool {
        match self {
            CallError::TimedOut(_) => true,
            CallError::Failed(e) => e.is_transient(),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt
    pub fn no_retry(timeout: Duration) -> Self {
        Self {
            timeout_ms: timeout.as_millis() as u64,
            max_retries: 0,
            initial_backoff_ms: 0,
        }
    }

    /// Get the per-attempt timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get the first backoff delay as a Duration
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Delay before retry number `retry` (0-based)
    pub fn backoff_for(&self, retry: u32) -> Duration {
        self.initial_backoff().saturating_mul(2u32.saturating_pow(retry))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::out_of_range("timeout_ms", "must be greater than 0"));
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::out_of_range(
                "max_retries",
                format!("must be at most {}, got {}", MAX_RETRIES_LIMIT, self.max_retries),
            ));
        }
        Ok(())
    }

    /// Run `call` under this policy
    ///
    /// Transient failures and timeouts are retried with exponential backoff
    /// until `max_retries` is exhausted. Permanent failures return at once.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, CallError<E>>
    where
        E: RetryableError,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let timeout = self.timeout();
        let mut attempt = 0u32;

        loop {
            let failure = match tokio::time::timeout(timeout, call()).await {
                Ok(Ok(value)) => {
                    if attempt > 0 {
                        tracing::debug!(operation, attempt, "Call succeeded after retry");
                    }
                    return Ok(value);
                }
                Ok(Err(e)) => {
                    if !e.is_transient() {
                        tracing::warn!(operation, error = %e, "Permanent failure, not retrying");
                        return Err(CallError::Failed(e));
                    }
                    CallError::Failed(e)
                }
                Err(_) => CallError::TimedOut(timeout),
            };

            if attempt >= self.max_retries {
                tracing::warn!(operation, attempts = attempt + 1, error = %failure, "Retries exhausted");
                return Err(failure);
            }

            let delay = self.backoff_for(attempt);
            tracing::warn!(
                operation,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "Transient failure, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
