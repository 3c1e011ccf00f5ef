//! Save Page Now request types and validation.

use serde::Serialize;

use crate::wayback::WaybackError;

/// A URL submitted for archiving. Sent as the form body of the save request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArchiveRequest {
    pub url: String,
}

impl ArchiveRequest {
    /// Surrounding whitespace is dropped so the submitted form value matches
    /// what `validate` checks.
    pub fn new(url: impl Into<String>) -> Self {
        let url: String = url.into();
        let trimmed = url.trim();
        if trimmed.len() == url.len() {
            return Self { url };
        }
        Self { url: trimmed.to_string() }
    }

    /// Validate the target URL before any network activity.
    ///
    /// The URL must be absolute, use http or https and name a host.
    pub fn validate(&self) -> Result<(), WaybackError> {
        let target = self.url.as_str();
        if target.trim().is_empty() {
            return Err(WaybackError::InvalidUrl("url cannot be empty".to_string()));
        }
        if target.trim() != target {
            return Err(WaybackError::InvalidUrl(format!("{target:?}: surrounding whitespace")));
        }

        let parsed = url::Url::parse(target).map_err(|e| WaybackError::InvalidUrl(format!("{target}: {e}")))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => return Err(WaybackError::InvalidUrl(format!("unsupported scheme: {scheme}"))),
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(WaybackError::InvalidUrl(format!("{target}: missing host")));
        }

        Ok(())
    }
}

/// Identifier of an asynchronous archive job on the service side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    pub job_id: String,
}

impl JobHandle {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self { job_id: job_id.into() }
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.job_id)
    }
}
