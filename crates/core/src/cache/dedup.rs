//! URL → outcome deduplication cache.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::outcome::ArchiveOutcome;

/// Process-lifetime map from requested URL to the last outcome archived for it.
///
/// Keys are the URL exactly as the caller passed it. Failed outcomes are stored
/// like any other and stay until overwritten or removed.
///
/// Cloning is cheap and every clone shares the same entries.
#[derive(Debug, Clone, Default)]
pub struct DedupCache {
    entries: Arc<RwLock<HashMap<String, Arc<ArchiveOutcome>>>>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the outcome previously stored for `url`.
    pub async fn get(&self, url: &str) -> Option<Arc<ArchiveOutcome>> {
        let entries = self.entries.read().await;
        let hit = entries.get(url).cloned();
        tracing::debug!(url, hit = hit.is_some(), "dedup cache lookup");
        hit
    }

    /// Store `outcome` for `url`, replacing any earlier entry.
    pub async fn put(&self, url: impl Into<String>, outcome: Arc<ArchiveOutcome>) {
        let mut entries = self.entries.write().await;
        entries.insert(url.into(), outcome);
    }

    /// Drop the entry for `url`, returning it if present.
    pub async fn remove(&self, url: &str) -> Option<Arc<ArchiveOutcome>> {
        self.entries.write().await.remove(url)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
