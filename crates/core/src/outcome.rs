//! Archive outcome returned to callers and stored in the dedup cache.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title recorded when the archived page title cannot be determined.
pub const UNKNOWN_TITLE: &str = "Could not get title";

/// Final status of an archive attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveStatus {
    Success,
    Failed,
}

/// Opaque reference handed back by a screenshot provider.
///
/// The archiver never inspects it; a provider may encode its own failure here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ScreenshotRef(pub String);

impl ScreenshotRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Result of archiving one URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArchiveOutcome {
    /// Backend that produced this outcome (e.g. "wayback").
    pub archiver: String,
    pub status: ArchiveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<ScreenshotRef>,
    /// When the archive snapshot was captured, if the service reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
    /// Human-readable reason for a failed outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_detail: Option<String>,
}

impl ArchiveOutcome {
    /// Successful outcome pointing at `archive_url`.
    pub fn success(archiver: impl Into<String>, archive_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            archiver: archiver.into(),
            status: ArchiveStatus::Success,
            archive_url: Some(archive_url.into()),
            title: Some(title.into()),
            screenshot: None,
            captured_at: None,
            failure_detail: None,
        }
    }

    /// Failed outcome carrying a human-readable reason.
    pub fn failed(archiver: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            archiver: archiver.into(),
            status: ArchiveStatus::Failed,
            archive_url: None,
            title: None,
            screenshot: None,
            captured_at: None,
            failure_detail: Some(detail.into()),
        }
    }

    pub fn with_screenshot(mut self, screenshot: Option<ScreenshotRef>) -> Self {
        self.screenshot = screenshot;
        self
    }

    pub fn with_captured_at(mut self, captured_at: Option<DateTime<Utc>>) -> Self {
        self.captured_at = captured_at;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ArchiveStatus::Success
    }
}

/// Decode a 14-digit Wayback timestamp (`YYYYMMDDhhmmss`, UTC).
pub fn parse_wayback_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(timestamp, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| naive.and_utc())
}
