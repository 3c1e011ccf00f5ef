//! Internet Archive "Save Page Now" client.
//!
//! Provides the two calls the service defines for asynchronous captures, the
//! bounded status poller, and the result builder that turns a finished job
//! into an [`ArchiveOutcome`](wayback_core::ArchiveOutcome).
//!
//! ### Endpoints
//!
//! - **Submit**: `POST {base}/save/` with form body `url=<target>`.
//! - **Status**: `GET {base}/save/status/{job_id}`.
//! - **Authentication**: `Authorization: LOW {key}:{secret}` on both calls.
//! - **Archive URL**: `{base}/web/{timestamp}/{original_url}`.
//! - **Retries**: none here. The poller owns the retry budget.

pub mod error;
pub mod poller;
pub mod request;
pub mod response;
pub mod result;

pub use error::{ArchiveFailure, WaybackError};
pub use poller::{JobPoller, PollOutcome, PollPolicy, StatusSource};
pub use request::{ArchiveRequest, JobHandle};
pub use response::JobStatus;
pub use result::{ResultBuilder, extract_title};

use reqwest::{StatusCode, header};
use std::sync::Arc;
use std::time::Duration;
use wayback_core::{AppConfig, Credentials};

/// Default base URL of the Wayback Machine.
pub const DEFAULT_BASE_URL: &str = "https://web.archive.org";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "wayback-archive/0.1";

/// Build the public archive URL for a finished capture.
pub fn archive_url(base_url: &str, timestamp: &str, original_url: &str) -> String {
    format!("{}/web/{}/{}", base_url.trim_end_matches('/'), timestamp, original_url)
}

/// Save Page Now client configuration.
#[derive(Debug, Clone)]
pub struct WaybackConfig {
    pub credentials: Credentials,
    /// Base URL (default: https://web.archive.org).
    pub base_url: String,
    /// Per-request timeout (default: 30s).
    pub timeout: Duration,
    pub user_agent: String,
}

impl WaybackConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Derive client settings from the application config.
    ///
    /// Fails with `MissingCredentials` unless both key and secret are set.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, WaybackError> {
        let credentials = config.require_credentials().map_err(|e| {
            tracing::warn!("{e}");
            WaybackError::MissingCredentials
        })?;

        Ok(Self {
            credentials,
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Save Page Now API client.
#[derive(Debug, Clone)]
pub struct WaybackClient {
    http: reqwest::Client,
    config: Arc<WaybackConfig>,
}

impl WaybackClient {
    /// Create a new client with the given configuration.
    pub fn new(config: WaybackConfig) -> Result<Self, WaybackError> {
        if config.credentials.key.is_empty() || config.credentials.secret.is_empty() {
            return Err(WaybackError::MissingCredentials);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .build()
            .map_err(|e| WaybackError::Network(Arc::new(e)))?;

        Ok(Self { http, config: Arc::new(config) })
    }

    /// Create a client from the application config.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, WaybackError> {
        Self::new(WaybackConfig::from_app_config(config)?)
    }

    pub fn config(&self) -> &WaybackConfig {
        &self.config
    }

    /// Archive URL for a capture, rooted at the configured base.
    pub fn archive_url(&self, timestamp: &str, original_url: &str) -> String {
        archive_url(&self.config.base_url, timestamp, original_url)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Submit a capture job. Exactly one HTTP request, no retries.
    pub async fn submit(&self, req: &ArchiveRequest) -> Result<JobHandle, WaybackError> {
        req.validate()?;

        let url = self.endpoint("/save/");
        tracing::debug!(target_url = %req.url, "submitting capture to Save Page Now");

        let http_response = self
            .http
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, self.config.credentials.authorization())
            .form(req)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(target_url = %req.url, %status, "Save Page Now submit response");
        check_status(status)?;

        let bytes = http_response.bytes().await?;
        let handle = response::parse_submission(&bytes)?;

        tracing::debug!(target_url = %req.url, job_id = %handle, "capture job accepted");
        Ok(handle)
    }

    /// Query the state of a capture job. Exactly one HTTP request, no retries.
    pub async fn query_status(&self, job: &JobHandle) -> Result<JobStatus, WaybackError> {
        let url = self.endpoint(&format!("/save/status/{}", job.job_id));

        let http_response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, self.config.credentials.authorization())
            .send()
            .await?;

        let status = http_response.status();
        check_status(status)?;

        let bytes = http_response.bytes().await?;
        response::parse_status(&bytes)
    }

    /// Plain GET of an archived page, returning its body as text.
    pub async fn fetch_page(&self, url: &str) -> Result<String, WaybackError> {
        let http_response = self
            .http
            .get(url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await?;

        let status = http_response.status();
        if !status.is_success() {
            return Err(WaybackError::HttpError { status: status.as_u16() });
        }

        Ok(http_response.text().await?)
    }
}

fn check_status(status: StatusCode) -> Result<(), WaybackError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(WaybackError::AuthError);
    }

    if !status.is_success() {
        return Err(WaybackError::HttpError { status: status.as_u16() });
    }

    Ok(())
}
