//! Client code for wayback-archive.
//!
//! This crate provides the Save Page Now client, the job status poller, the
//! result builder and the [`Archiver`] backends built on top of them.

pub mod archiver;
pub mod screenshot;
pub mod wayback;

pub use archiver::{Archiver, WaybackArchiver};
pub use screenshot::{NoScreenshots, ScreenshotProvider};
pub use wayback::{
    ArchiveFailure, ArchiveRequest, JobHandle, JobPoller, JobStatus, PollOutcome, PollPolicy, ResultBuilder,
    StatusSource, WaybackClient, WaybackConfig, WaybackError, archive_url, extract_title,
};
