//! Turns a finished poll into an [`ArchiveOutcome`].

use scraper::{Html, Selector};
use std::sync::Arc;
use wayback_core::{ArchiveOutcome, UNKNOWN_TITLE, parse_wayback_timestamp};

use crate::screenshot::ScreenshotProvider;
use crate::wayback::{ArchiveFailure, JobHandle, PollOutcome, WaybackClient};

/// Backend name recorded on every outcome from this module.
pub const WAYBACK: &str = "wayback";

/// Title the Wayback Machine serves on its own interstitial pages.
const PLACEHOLDER_TITLE: &str = "Wayback Machine";

/// Extract the text of the first `<title>` element.
///
/// Returns `None` for a missing or blank title and for the Wayback Machine's
/// generic placeholder.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    let title = document.select(&selector).next()?.text().collect::<String>();
    let title = title.trim();

    if title.is_empty() || title == PLACEHOLDER_TITLE {
        return None;
    }

    Some(title.to_string())
}

/// Assembles outcomes for finished capture jobs.
#[derive(Clone)]
pub struct ResultBuilder {
    client: WaybackClient,
    screenshots: Arc<dyn ScreenshotProvider>,
}

impl ResultBuilder {
    pub fn new(client: WaybackClient, screenshots: Arc<dyn ScreenshotProvider>) -> Self {
        Self { client, screenshots }
    }

    /// Build the outcome for `url` from where polling stopped.
    ///
    /// Only `Completed` yields `Ok`; every other poll result maps to its own
    /// [`ArchiveFailure`]. Title and screenshot problems never fail the outcome.
    pub async fn finalize(&self, url: &str, job: &JobHandle, poll: PollOutcome) -> Result<ArchiveOutcome, ArchiveFailure> {
        let job_id = job.job_id.clone();

        let (timestamp, original_url) = match poll {
            PollOutcome::Completed { timestamp, original_url, .. } => (timestamp, original_url),
            PollOutcome::Failed { reason, .. } => return Err(ArchiveFailure::RemoteFailure { job_id, reason }),
            PollOutcome::Exhausted { attempts } => return Err(ArchiveFailure::PollExhausted { job_id, attempts }),
            PollOutcome::TransportFailed { attempts, error } => {
                return Err(ArchiveFailure::FinalCheckFailed { job_id, attempts, error });
            }
            PollOutcome::Aborted { error, .. } => return Err(ArchiveFailure::StatusCheckAborted { job_id, error }),
            PollOutcome::Cancelled { .. } => return Err(ArchiveFailure::Cancelled { job_id }),
        };

        let archive_url = self.client.archive_url(&timestamp, &original_url);
        let title = self.fetch_title(&archive_url).await;
        let screenshot = self.screenshots.capture(url).await;

        tracing::info!(url, %archive_url, %title, screenshot = screenshot.is_some(), "archived");

        Ok(ArchiveOutcome::success(WAYBACK, archive_url, title)
            .with_screenshot(screenshot)
            .with_captured_at(parse_wayback_timestamp(&timestamp)))
    }

    /// Best-effort title of the archived page.
    async fn fetch_title(&self, archive_url: &str) -> String {
        match self.client.fetch_page(archive_url).await {
            Ok(html) => extract_title(&html).unwrap_or_else(|| {
                tracing::debug!(%archive_url, "archived page has no usable title");
                UNKNOWN_TITLE.to_string()
            }),
            Err(e) => {
                tracing::warn!(%archive_url, error = %e, "could not fetch archived page for title");
                UNKNOWN_TITLE.to_string()
            }
        }
    }
}
