//! Retry policy for outbound provider calls.

use std::fmt;
use std::time::Duration;

use crate::TRACING_TARGET;

/// Classification hook for retryable failures.
///
/// Provider error types implement this so [`RetryConfig::retry`] can
/// distinguish transient failures (retried) from terminal ones (surfaced
/// immediately). The expected policy: transport timeouts, connection
/// failures, 429 and 5xx responses are retryable; every other 4xx,
/// authentication and validation failures, and explicit cancellation are
/// not.
pub trait Retryable {
    /// Returns whether the operation that produced this error may be
    /// attempted again.
    fn is_retryable(&self) -> bool;
}

/// Configuration for retry behavior on failed provider calls.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts (1 means no retries).
    pub max_attempts: u32,
    /// Base delay between attempts; the wait before attempt `n + 1` is
    /// `base_delay * n`. A deliberately simple escalation, not pure
    /// exponential backoff.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryConfig {
    /// Creates a new retry configuration.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Creates a configuration that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Returns the delay to wait after `completed` failed attempts.
    fn backoff(&self, completed: u32) -> Duration {
        self.base_delay.saturating_mul(completed)
    }

    /// Runs an async operation, retrying transient failures.
    ///
    /// The operation is attempted up to `max_attempts` times. A failure
    /// whose [`Retryable::is_retryable`] returns `false` short-circuits and
    /// is returned as-is. On exhaustion the last error is surfaced after a
    /// structured log record naming the operation and attempt count.
    pub async fn retry<F, Fut, T, E>(&self, operation_name: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !err.is_retryable() {
                        tracing::debug!(
                            target: TRACING_TARGET,
                            operation = operation_name,
                            attempt,
                            error = %err,
                            "Non-retryable error, failing immediately"
                        );
                        return Err(err);
                    }

                    last_error = Some(err);

                    if attempt < max_attempts {
                        let backoff = self.backoff(attempt);
                        tracing::debug!(
                            target: TRACING_TARGET,
                            operation = operation_name,
                            attempt,
                            max_attempts,
                            backoff_ms = backoff.as_millis(),
                            "Retrying operation after backoff"
                        );
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        let err = last_error.unwrap_or_else(|| unreachable!("at least one attempt ran"));
        tracing::warn!(
            target: TRACING_TARGET,
            operation = operation_name,
            attempts = max_attempts,
            error = %err,
            "All retry attempts exhausted"
        );
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error("transient")]
        Transient,
        #[error("terminal")]
        Terminal,
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            matches!(self, TestError::Transient)
        }
    }

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_backoff_is_linear_multiplicative() {
        let config = RetryConfig::new(4, Duration::from_millis(100));
        assert_eq!(config.backoff(1), Duration::from_millis(100));
        assert_eq!(config.backoff(2), Duration::from_millis(200));
        assert_eq!(config.backoff(3), Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_retry_success_on_first_attempt() {
        let config = RetryConfig::default();
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = config
            .retry("test", || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, TestError>(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_transient_failures() {
        let config = RetryConfig::new(3, Duration::from_millis(1));
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = config
            .retry("test", || {
                let calls = calls_clone.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 3 {
                        Err(TestError::Transient)
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_error_triggers_exactly_one_attempt() {
        let config = RetryConfig::new(3, Duration::from_millis(1));
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<(), _> = config
            .retry("test", || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Terminal)
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_error_exhausts_all_attempts() {
        let config = RetryConfig::new(3, Duration::from_millis(1));
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<(), _> = config
            .retry("test", || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Transient)
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
