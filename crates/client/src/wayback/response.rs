//! Save Page Now response types and normalization.

use serde::Deserialize;

use crate::wayback::{JobHandle, WaybackError};

/// Raw body of a `POST /save/` response.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SubmitResponse {
    /// Turn the body into a job handle.
    ///
    /// A body with a message but no job id is an explicit rejection; a body
    /// with neither is treated as a transport failure.
    pub fn into_handle(self) -> Result<JobHandle, WaybackError> {
        match (self.job_id, self.message) {
            (Some(job_id), _) if !job_id.is_empty() => Ok(JobHandle::new(job_id)),
            (_, Some(message)) => Err(WaybackError::RemoteRejected { message }),
            _ => Err(WaybackError::MissingJobId),
        }
    }
}

/// Raw body of a `GET /save/status/{job_id}` response.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub status_ext: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// State of an archive job as reported by one status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Success { timestamp: String, original_url: String },
    Failure { reason: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

impl StatusResponse {
    /// Normalize into a [`JobStatus`].
    ///
    /// `raw` is the original body, used as the failure reason when the service
    /// gives neither a message nor an extended status.
    pub fn into_status(self, raw: &str) -> Result<JobStatus, WaybackError> {
        match self.status.as_str() {
            "pending" => Ok(JobStatus::Pending),
            "success" => match (self.timestamp, self.original_url) {
                (Some(timestamp), Some(original_url)) => Ok(JobStatus::Success { timestamp, original_url }),
                _ => Err(WaybackError::Parse("success status without timestamp or original_url".to_string())),
            },
            _ => {
                let reason = self.message.or(self.status_ext).unwrap_or_else(|| raw.trim().to_string());
                Ok(JobStatus::Failure { reason })
            }
        }
    }
}

/// Parse a status body into a [`JobStatus`].
pub fn parse_status(body: &[u8]) -> Result<JobStatus, WaybackError> {
    let raw = String::from_utf8_lossy(body);
    let response: StatusResponse = serde_json::from_slice(body).map_err(|e| WaybackError::Parse(e.to_string()))?;
    response.into_status(&raw)
}

/// Parse a submission body into a [`JobHandle`].
pub fn parse_submission(body: &[u8]) -> Result<JobHandle, WaybackError> {
    let response: SubmitResponse = serde_json::from_slice(body).map_err(|e| WaybackError::Parse(e.to_string()))?;
    response.into_handle()
}
