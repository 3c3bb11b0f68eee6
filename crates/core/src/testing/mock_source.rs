//! Mock search source for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::source::{local_page, Entry, Source, SourceError, SourceKind, SourcePage};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFetch {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
}

/// Mock implementation of the Source trait.
///
/// Provides controllable behavior for testing:
/// - Return configured entries, filtered by query words and sliced per page
/// - Track fetches for assertions
/// - Simulate failures and delays
///
/// # Example
///
/// ```rust,ignore
/// use marquee_core::testing::{fixtures, MockSource};
///
/// let source = MockSource::new(SourceKind::Index);
/// source.set_entries(vec![fixtures::index_entry("Heat 1995", 1995, "aa")]).await;
///
/// let page = source.fetch("heat", 1, 20).await?;
/// assert_eq!(page.entries.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockSource {
    kind: SourceKind,
    /// Configured entries.
    entries: Arc<RwLock<Vec<Entry>>>,
    /// Reported total, overriding the number of matching entries.
    total: Arc<RwLock<Option<usize>>>,
    /// Recorded fetches.
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<SourceError>>>,
    /// Simulated latency per call.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockSource {
    /// Create a new mock source with no entries.
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            entries: Arc::new(RwLock::new(Vec::new())),
            total: Arc::new(RwLock::new(None)),
            fetches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the entries to return.
    pub async fn set_entries(&self, entries: Vec<Entry>) {
        *self.entries.write().await = entries;
    }

    /// Report a fixed total instead of the number of matches.
    pub async fn set_total(&self, total: usize) {
        *self.total.write().await = Some(total);
    }

    /// Get recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Get the number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: SourceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Add simulated latency to every call.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    async fn simulate(&self) -> Result<(), SourceError> {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.next_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Every query word appears in the title, ignoring case.
fn matches_query(entry: &Entry, query: &str) -> bool {
    let title = entry.title.to_lowercase();
    query
        .to_lowercase()
        .split_whitespace()
        .all(|word| title.contains(word))
}

#[async_trait]
impl Source for MockSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SourcePage, SourceError> {
        self.fetches.write().await.push(RecordedFetch {
            query: query.to_string(),
            page,
            page_size,
        });
        self.simulate().await?;

        let matching: Vec<Entry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| matches_query(e, query))
            .cloned()
            .collect();
        let total = self.total.read().await.unwrap_or(matching.len());

        Ok(SourcePage {
            entries: local_page(matching, page, page_size),
            total,
        })
    }

    async fn details(&self, id: &str) -> Result<Entry, SourceError> {
        if self.kind == SourceKind::Index {
            return Err(SourceError::Unsupported(
                "index source does not support details lookup".to_string(),
            ));
        }
        self.simulate().await?;

        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("mock movie {}", id)))
    }
}
