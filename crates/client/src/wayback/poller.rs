//! Bounded wait loop over a capture job's status.
//!
//! The first query runs right after submission and every later one waits
//! `interval` first, so a budget of `max_attempts` covers roughly
//! `(max_attempts - 1) * interval` of wall time. Captures usually take
//! 90-120 seconds, hence the fixed interval instead of exponential backoff.
//!
//! | query result                | effect                                  |
//! |-----------------------------|-----------------------------------------|
//! | `Pending`                   | consume one attempt, keep polling       |
//! | `Success` / `Failure`       | stop, terminal                          |
//! | retryable transport error   | consume one attempt, keep polling       |
//! | permanent HTTP error        | stop, [`PollOutcome::Aborted`]          |
//!
//! When the budget runs out the last query decides between
//! [`PollOutcome::Exhausted`] (still pending) and
//! [`PollOutcome::TransportFailed`] (service unreachable at the end).

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wayback_core::AppConfig;

use crate::wayback::{JobHandle, JobStatus, WaybackClient, WaybackError};

/// Anything that can answer "what state is this job in?".
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn query_status(&self, job: &JobHandle) -> Result<JobStatus, WaybackError>;
}

#[async_trait::async_trait]
impl StatusSource for WaybackClient {
    async fn query_status(&self, job: &JobHandle) -> Result<JobStatus, WaybackError> {
        WaybackClient::query_status(self, job).await
    }
}

/// Retry budget for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Total number of status queries, including the first (default: 30).
    pub max_attempts: u32,
    /// Delay before every query after the first (default: 3s).
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self { max_attempts: 30, interval: Duration::from_secs(3) }
    }
}

impl PollPolicy {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self { max_attempts: config.poll_max_attempts.max(1), interval: config.poll_interval() }
    }
}

/// Where the wait loop stopped.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// The service finished the capture.
    Completed { timestamp: String, original_url: String, attempts: u32 },
    /// The service reported the capture failed.
    Failed { reason: String, attempts: u32 },
    /// Budget spent while the job was still pending.
    Exhausted { attempts: u32 },
    /// Budget spent and the final query failed at the transport layer.
    TransportFailed { attempts: u32, error: WaybackError },
    /// A status query failed in a way retrying cannot fix.
    Aborted { attempts: u32, error: WaybackError },
    /// The caller gave up on the job.
    Cancelled { attempts: u32 },
}

impl PollOutcome {
    /// Number of status queries issued.
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Completed { attempts, .. }
            | PollOutcome::Failed { attempts, .. }
            | PollOutcome::Exhausted { attempts }
            | PollOutcome::TransportFailed { attempts, .. }
            | PollOutcome::Aborted { attempts, .. }
            | PollOutcome::Cancelled { attempts } => *attempts,
        }
    }
}

/// Polls a [`StatusSource`] until the job is terminal or the budget is spent.
#[derive(Debug, Clone)]
pub struct JobPoller<S> {
    source: S,
    policy: PollPolicy,
    cancel: CancellationToken,
}

impl<S: StatusSource> JobPoller<S> {
    pub fn new(source: S, policy: PollPolicy) -> Self {
        Self { source, policy, cancel: CancellationToken::new() }
    }

    /// Abandon the wait as soon as `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Run the wait loop for `job`.
    pub async fn wait_for_terminal(&self, job: &JobHandle) -> PollOutcome {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<WaybackError> = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return self.cancelled(job, attempt - 1),
                    _ = tokio::time::sleep(self.policy.interval) => {}
                }
            }

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.cancelled(job, attempt - 1),
                result = self.source.query_status(job) => result,
            };

            match result {
                Ok(JobStatus::Pending) => {
                    tracing::debug!(job_id = %job, attempt, max_attempts, "capture still pending");
                    last_error = None;
                }
                Ok(JobStatus::Success { timestamp, original_url }) => {
                    tracing::info!(job_id = %job, attempt, %timestamp, "capture completed");
                    return PollOutcome::Completed { timestamp, original_url, attempts: attempt };
                }
                Ok(JobStatus::Failure { reason }) => {
                    tracing::warn!(job_id = %job, attempt, %reason, "capture failed remotely");
                    return PollOutcome::Failed { reason, attempts: attempt };
                }
                Err(error) if error.is_retryable() => {
                    tracing::debug!(job_id = %job, attempt, max_attempts, %error, "status query failed, will retry");
                    last_error = Some(error);
                }
                Err(error) => {
                    tracing::warn!(job_id = %job, attempt, %error, "status query failed permanently");
                    return PollOutcome::Aborted { attempts: attempt, error };
                }
            }
        }

        match last_error {
            Some(error) => {
                tracing::warn!(job_id = %job, attempts = max_attempts, %error, "final status query failed");
                PollOutcome::TransportFailed { attempts: max_attempts, error }
            }
            None => {
                tracing::warn!(job_id = %job, attempts = max_attempts, "capture still pending after poll budget");
                PollOutcome::Exhausted { attempts: max_attempts }
            }
        }
    }

    fn cancelled(&self, job: &JobHandle, attempts: u32) -> PollOutcome {
        tracing::info!(job_id = %job, attempts, "status polling cancelled");
        PollOutcome::Cancelled { attempts }
    }
}
