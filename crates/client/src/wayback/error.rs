//! Save Page Now client error types and the archive failure taxonomy.

use std::sync::Arc;

/// Errors from a single Save Page Now request.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WaybackError {
    /// Access key or secret not configured.
    #[error("missing credentials: WAYBACK_KEY and WAYBACK_SECRET must both be set")]
    MissingCredentials,

    /// The URL to archive is not usable.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Authentication failed (invalid access key or secret).
    #[error("authentication failed: invalid access key or secret")]
    AuthError,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Submission answered without a job id and without an explanation.
    #[error("submission response carried neither a job id nor an error message")]
    MissingJobId,

    /// Service was reachable but declined the submission.
    #[error("submission rejected: {message}")]
    RemoteRejected { message: String },
}

impl WaybackError {
    /// Whether the error happened at the network/HTTP layer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            WaybackError::AuthError
                | WaybackError::HttpError { .. }
                | WaybackError::Timeout
                | WaybackError::Network(_)
                | WaybackError::Parse(_)
                | WaybackError::MissingJobId
        )
    }

    /// Whether repeating the same request may succeed.
    ///
    /// Client errors other than 408 and 429 are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            WaybackError::Timeout | WaybackError::Network(_) | WaybackError::Parse(_) => true,
            WaybackError::HttpError { status } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for WaybackError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { WaybackError::Timeout } else { WaybackError::Network(Arc::new(err)) }
    }
}

/// Why an archive attempt produced a failed outcome.
///
/// The `Display` text is what callers see as `failure_detail`, so every cause
/// renders differently.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArchiveFailure {
    #[error("invalid archive request: {0}")]
    InvalidRequest(String),

    #[error("Internet Archive submission failed: {0}")]
    Submission(WaybackError),

    #[error("Internet Archive rejected the submission: {message}")]
    Rejected { message: String },

    #[error("Internet Archive job {job_id} exhausted the poll budget after {attempts} status checks")]
    PollExhausted { job_id: String, attempts: u32 },

    #[error("Internet Archive unreachable at final status check for job {job_id} after {attempts} attempts: {error}")]
    FinalCheckFailed { job_id: String, attempts: u32, error: WaybackError },

    #[error("Internet Archive status check for job {job_id} failed permanently: {error}")]
    StatusCheckAborted { job_id: String, error: WaybackError },

    #[error("Internet Archive reported job {job_id} failed: {reason}")]
    RemoteFailure { job_id: String, reason: String },

    #[error("archiving cancelled before job {job_id} reached a terminal state")]
    Cancelled { job_id: String },

    #[error("archiver shut down before {url} was submitted")]
    ShutDown { url: String },
}

impl ArchiveFailure {
    /// The run was abandoned rather than answered; such outcomes are not cached.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ArchiveFailure::Cancelled { .. } | ArchiveFailure::ShutDown { .. })
    }
}

impl From<WaybackError> for ArchiveFailure {
    fn from(err: WaybackError) -> Self {
        match err {
            WaybackError::RemoteRejected { message } => ArchiveFailure::Rejected { message },
            WaybackError::InvalidUrl(msg) => ArchiveFailure::InvalidRequest(msg),
            other => ArchiveFailure::Submission(other),
        }
    }
}
