//! Screenshot provider seam.
//!
//! Capturing screenshots lives outside this crate. The archiver only asks a
//! provider for a reference and attaches whatever comes back.

use wayback_core::ScreenshotRef;

/// External capability that captures a page and returns a reference to the image.
#[async_trait::async_trait]
pub trait ScreenshotProvider: Send + Sync {
    /// Capture `url`. `None` means no screenshot is available.
    async fn capture(&self, url: &str) -> Option<ScreenshotRef>;
}

/// Provider that never captures anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScreenshots;

#[async_trait::async_trait]
impl ScreenshotProvider for NoScreenshots {
    async fn capture(&self, _url: &str) -> Option<ScreenshotRef> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_screenshots() {
        assert!(NoScreenshots.capture("https://example.com").await.is_none());
    }
}
