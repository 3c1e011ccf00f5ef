//! Archiver backends and the Wayback orchestrator.
//!
//! Every backend implements [`Archiver`]; callers hold a `dyn Archiver` and
//! never need to know which service did the work.

use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use wayback_core::{AppConfig, ArchiveOutcome, DedupCache};

use crate::screenshot::{NoScreenshots, ScreenshotProvider};
use crate::wayback::result::WAYBACK;
use crate::wayback::{
    ArchiveFailure, ArchiveRequest, JobPoller, PollPolicy, ResultBuilder, WaybackClient, WaybackError,
};

/// An archiving backend.
#[async_trait::async_trait]
pub trait Archiver: Send + Sync {
    /// Short backend name recorded on outcomes.
    fn name(&self) -> &'static str;

    /// Archive `url`. With `check_cache`, a previous outcome for the same URL
    /// is returned without any network activity.
    async fn download(&self, url: &str, check_cache: bool) -> Arc<ArchiveOutcome>;
}

/// Submit → poll → build → cache pipeline against Save Page Now.
///
/// Clones share the HTTP client, the cache and the shutdown signal, so one
/// clone per task is the intended way to archive URLs concurrently.
#[derive(Clone)]
pub struct WaybackArchiver {
    client: WaybackClient,
    policy: PollPolicy,
    cache: DedupCache,
    screenshots: Arc<dyn ScreenshotProvider>,
    shutdown: CancellationToken,
}

impl WaybackArchiver {
    pub fn new(client: WaybackClient, policy: PollPolicy) -> Self {
        Self {
            client,
            policy,
            cache: DedupCache::new(),
            screenshots: Arc::new(NoScreenshots),
            shutdown: CancellationToken::new(),
        }
    }

    /// Build an archiver from the application config.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, WaybackError> {
        let client = WaybackClient::from_app_config(config)?;
        Ok(Self::new(client, PollPolicy::from_app_config(config)))
    }

    pub fn with_screenshots(mut self, screenshots: Arc<dyn ScreenshotProvider>) -> Self {
        self.screenshots = screenshots;
        self
    }

    /// Use an existing cache, e.g. one shared with another archiver.
    pub fn with_cache(mut self, cache: DedupCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &DedupCache {
        &self.cache
    }

    pub fn client(&self) -> &WaybackClient {
        &self.client
    }

    /// Abandon every in-flight poll. Permanent for this archiver and its clones.
    pub fn shutdown(&self) {
        tracing::info!("shutting down wayback archiver");
        self.shutdown.cancel();
    }

    /// Archive one URL.
    ///
    /// Never fails: every problem becomes a failed outcome. The outcome is
    /// cached under `url` unless the run was cancelled.
    pub async fn archive(&self, url: &str, check_cache: bool) -> Arc<ArchiveOutcome> {
        if check_cache && let Some(hit) = self.cache.get(url).await {
            tracing::debug!(url, "returning cached outcome");
            return hit;
        }

        let (outcome, cacheable) = match self.run(url).await {
            Ok(outcome) => (outcome, true),
            Err(failure) => {
                tracing::warn!(url, error = %failure, "archive failed");
                let cacheable = !failure.is_cancellation();
                (ArchiveOutcome::failed(WAYBACK, failure.to_string()), cacheable)
            }
        };

        let outcome = Arc::new(outcome);
        if cacheable {
            self.cache.put(url, outcome.clone()).await;
        }
        outcome
    }

    async fn run(&self, url: &str) -> Result<ArchiveOutcome, ArchiveFailure> {
        let request = ArchiveRequest::new(url);
        request.validate()?;

        if self.shutdown.is_cancelled() {
            return Err(ArchiveFailure::ShutDown { url: request.url });
        }

        let job = self.client.submit(&request).await?;

        let poller = JobPoller::new(self.client.clone(), self.policy).with_cancellation(self.shutdown.child_token());
        let poll = poller.wait_for_terminal(&job).await;

        ResultBuilder::new(self.client.clone(), self.screenshots.clone())
            .finalize(url, &job, poll)
            .await
    }

    /// Archive several URLs, one task each, returning outcomes in input order.
    ///
    /// With `check_cache`, a URL repeated in `urls` is archived once and every
    /// position it appears at shares that outcome.
    pub async fn archive_many<I>(&self, urls: I, check_cache: bool) -> Vec<(String, Arc<ArchiveOutcome>)>
    where
        I: IntoIterator<Item = String>,
    {
        let mut handles = Vec::new();
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut positions = Vec::new();

        for url in urls {
            if check_cache && let Some(&task) = first_seen.get(&url) {
                positions.push((url, task));
                continue;
            }

            let task = handles.len();
            let archiver = self.clone();
            let task_url = url.clone();
            handles.push((url.clone(), tokio::spawn(async move { archiver.archive(&task_url, check_cache).await })));
            if check_cache {
                first_seen.insert(url.clone(), task);
            }
            positions.push((url, task));
        }

        let mut finished = Vec::with_capacity(handles.len());
        for (url, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(url = %url, error = %e, "archive task did not complete");
                    Arc::new(ArchiveOutcome::failed(WAYBACK, format!("archive task did not complete: {e}")))
                }
            };
            finished.push(outcome);
        }

        positions.into_iter().map(|(url, task)| (url, finished[task].clone())).collect()
    }
}

#[async_trait::async_trait]
impl Archiver for WaybackArchiver {
    fn name(&self) -> &'static str {
        WAYBACK
    }

    async fn download(&self, url: &str, check_cache: bool) -> Arc<ArchiveOutcome> {
        self.archive(url, check_cache).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wayback::WaybackConfig;
    use wayback_core::{ArchiveStatus, Credentials};

    fn archiver() -> WaybackArchiver {
        let client = WaybackClient::new(WaybackConfig::new(Credentials::new("k", "s"))).unwrap();
        WaybackArchiver::new(client, PollPolicy::default())
    }

    #[test]
    fn test_from_app_config_requires_credentials() {
        let result = WaybackArchiver::from_app_config(&AppConfig::default());
        assert!(matches!(result, Err(WaybackError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let archiver = archiver();
        let cached = Arc::new(ArchiveOutcome::success(WAYBACK, "https://web.archive.org/web/1/x", "cached"));
        archiver.cache().put("https://example.com", cached.clone()).await;

        let outcome = archiver.archive("https://example.com", true).await;
        assert!(Arc::ptr_eq(&outcome, &cached));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_and_is_cached() {
        let archiver = archiver();

        let outcome = archiver.archive("not a url", false).await;
        assert_eq!(outcome.status, ArchiveStatus::Failed);
        assert!(outcome.failure_detail.as_deref().unwrap().contains("invalid archive request"));
        assert!(archiver.cache().get("not a url").await.is_some());
    }

    #[tokio::test]
    async fn test_shutdown_before_submit_is_not_cached() {
        let archiver = archiver();
        archiver.shutdown();

        let outcome = archiver.archive("https://example.com", false).await;
        assert_eq!(outcome.status, ArchiveStatus::Failed);
        assert!(outcome.failure_detail.as_deref().unwrap().contains("shut down before"));
        assert!(archiver.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_archiver_trait_object() {
        let archiver: Arc<dyn Archiver> = Arc::new(archiver());
        assert_eq!(archiver.name(), "wayback");

        let outcome = archiver.download("ftp://example.com", false).await;
        assert!(!outcome.is_success());
        assert_eq!(outcome.archiver, "wayback");
    }
}
