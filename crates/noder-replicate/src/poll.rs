//! Bounded polling for in-flight predictions.

use std::time::{Duration, Instant};

use noder_reqwest::Retryable;

use crate::TRACING_TARGET;
use crate::client::ReplicateClient;
use crate::error::{Error, Result};
use crate::prediction::{Prediction, PredictionStatus};

/// Default interval between status checks: 1 second.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default poll attempt budget: 300 attempts (5 minutes at 1 s).
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 300;

/// How often progress is reported, in attempts.
const PROGRESS_EVERY: u32 = 10;

/// Callback signature for poll progress reports.
pub type ProgressFn<'a> = dyn Fn(PollProgress) + Send + Sync + 'a;

/// Configuration for the poll loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed interval between status checks.
    pub interval: Duration,
    /// Maximum number of status checks before reporting a timeout.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
        }
    }
}

impl PollConfig {
    /// Sets the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// A progress snapshot, reported every tenth attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollProgress {
    /// Status checks performed so far.
    pub attempts: u32,
    /// Attempt budget.
    pub max_attempts: u32,
    /// Seconds elapsed since polling began.
    pub elapsed_seconds: u64,
}

impl ReplicateClient {
    /// Polls a prediction until it reaches a terminal state.
    ///
    /// Checks the status on a fixed interval up to `config.max_attempts`
    /// times. A `succeeded` prediction is returned; `failed` and `canceled`
    /// surface the provider's error; exhausting the budget yields
    /// [`Error::PollTimeout`], which is distinct from a provider-reported
    /// failure. Transient fetch errors consume an attempt and the loop
    /// continues; terminal fetch errors propagate immediately.
    pub async fn poll_prediction(
        &self,
        prediction_id: &str,
        config: &PollConfig,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> Result<Prediction> {
        poll_with(
            || self.get_prediction(prediction_id),
            prediction_id,
            config,
            on_progress,
        )
        .await
    }
}

/// Poll loop over an abstract fetch operation.
async fn poll_with<F, Fut>(
    mut fetch: F,
    prediction_id: &str,
    config: &PollConfig,
    on_progress: Option<&ProgressFn<'_>>,
) -> Result<Prediction>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Prediction>>,
{
    let started = Instant::now();
    let max_attempts = config.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match fetch().await {
            Ok(prediction) => {
                if prediction.status.is_terminal() {
                    return resolve_terminal(prediction);
                }

                tracing::trace!(
                    target: TRACING_TARGET,
                    prediction_id,
                    attempt,
                    status = %prediction.status,
                    "Prediction still in flight"
                );
            }
            Err(err) if err.is_retryable() => {
                // A transient status-check failure consumes an attempt so
                // the loop stays bounded even against a flaky endpoint.
                tracing::debug!(
                    target: TRACING_TARGET,
                    prediction_id,
                    attempt,
                    error = %err,
                    "Transient error while polling, continuing"
                );
            }
            Err(err) => return Err(err),
        }

        if attempt % PROGRESS_EVERY == 0 {
            if let Some(report) = on_progress {
                report(PollProgress {
                    attempts: attempt,
                    max_attempts,
                    elapsed_seconds: started.elapsed().as_secs(),
                });
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(config.interval).await;
        }
    }

    tracing::warn!(
        target: TRACING_TARGET,
        prediction_id,
        attempts = max_attempts,
        "Prediction did not reach a terminal state within the attempt budget"
    );
    Err(Error::PollTimeout {
        attempts: max_attempts,
    })
}

/// Maps a terminal prediction to the caller-facing result.
fn resolve_terminal(prediction: Prediction) -> Result<Prediction> {
    match prediction.status {
        PredictionStatus::Succeeded => Ok(prediction),
        PredictionStatus::Failed => Err(Error::PredictionFailed {
            message: prediction
                .error
                .unwrap_or_else(|| "prediction failed without an error message".into()),
        }),
        PredictionStatus::Canceled => Err(Error::PredictionCanceled),
        PredictionStatus::Starting | PredictionStatus::Processing => {
            unreachable!("resolve_terminal called with non-terminal status")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use super::*;

    fn prediction(status: PredictionStatus) -> Prediction {
        Prediction {
            id: "p1".into(),
            status,
            output: None,
            error: None,
            logs: None,
            metrics: None,
        }
    }

    fn fast_config(max_attempts: u32) -> PollConfig {
        PollConfig::default()
            .with_interval(Duration::from_millis(1))
            .with_max_attempts(max_attempts)
    }

    #[tokio::test]
    async fn test_poll_returns_on_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = poll_with(
            || {
                let calls = calls_clone.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok(if n < 3 {
                        prediction(PredictionStatus::Processing)
                    } else {
                        prediction(PredictionStatus::Succeeded)
                    })
                }
            },
            "p1",
            &fast_config(10),
            None,
        )
        .await;

        assert_eq!(result.unwrap().status, PredictionStatus::Succeeded);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_times_out_after_exactly_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = poll_with(
            || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(prediction(PredictionStatus::Processing))
                }
            },
            "p1",
            &fast_config(5),
            None,
        )
        .await;

        assert!(matches!(result, Err(Error::PollTimeout { attempts: 5 })));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_poll_surfaces_provider_failure_message() {
        let result = poll_with(
            || async {
                Ok(Prediction {
                    error: Some("NSFW content detected".into()),
                    ..prediction(PredictionStatus::Failed)
                })
            },
            "p1",
            &fast_config(10),
            None,
        )
        .await;

        match result {
            Err(Error::PredictionFailed { message }) => {
                assert_eq!(message, "NSFW content detected");
            }
            other => panic!("expected PredictionFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_poll_reports_progress_every_tenth_attempt() {
        let reports: Arc<Mutex<Vec<PollProgress>>> = Arc::new(Mutex::new(Vec::new()));
        let reports_clone = reports.clone();
        let report: Box<ProgressFn> = Box::new(move |progress| {
            reports_clone.lock().unwrap().push(progress);
        });

        let result = poll_with(
            || async { Ok(prediction(PredictionStatus::Processing)) },
            "p1",
            &fast_config(25),
            Some(report.as_ref()),
        )
        .await;

        assert!(matches!(result, Err(Error::PollTimeout { .. })));
        let reports = reports.lock().unwrap();
        assert_eq!(
            reports.iter().map(|p| p.attempts).collect::<Vec<_>>(),
            vec![10, 20]
        );
        assert!(reports.iter().all(|p| p.max_attempts == 25));
    }

    #[tokio::test]
    async fn test_transient_fetch_errors_consume_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = poll_with(
            || {
                let calls = calls_clone.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(Error::from_status(503, "overloaded".into()))
                }
            },
            "p1",
            &fast_config(3),
            None,
        )
        .await;

        assert!(matches!(result, Err(Error::PollTimeout { attempts: 3 })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_fetch_error_propagates() {
        let result = poll_with(
            || async { Err(Error::from_status(404, "gone".into())) },
            "p1",
            &fast_config(10),
            None,
        )
        .await;

        assert!(matches!(result, Err(Error::Api { status: 404, .. })));
    }
}
