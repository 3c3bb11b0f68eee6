//! Mock metadata lookup for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::metadata::{EnrichmentResult, MediaType, MetadataError, MetadataLookup, TitleQuery};

/// A recorded lookup for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedLookup {
    ById(String),
    ByTitle(TitleQuery),
}

type TitleKey = (String, Option<MediaType>);

/// Mock implementation of the MetadataLookup trait.
///
/// Title lookups match case-insensitively on the title and exactly on the
/// media type filter; the year is recorded but ignored. Tracks the highest
/// number of lookups in flight at once so fan-out can be asserted.
#[derive(Debug, Default)]
pub struct MockMetadata {
    by_id: Arc<RwLock<HashMap<String, EnrichmentResult>>>,
    by_title: Arc<RwLock<HashMap<TitleKey, EnrichmentResult>>>,
    lookups: Arc<RwLock<Vec<RecordedLookup>>>,
    next_error: Arc<RwLock<Option<MetadataError>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockMetadata {
    /// Create a new mock with no known titles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer id lookups for `id`.
    pub async fn add_by_id(&self, id: &str, result: EnrichmentResult) {
        self.by_id.write().await.insert(id.to_string(), result);
    }

    /// Answer untyped title lookups for `title`.
    pub async fn add_by_title(&self, title: &str, result: EnrichmentResult) {
        self.by_title
            .write()
            .await
            .insert((title.to_lowercase(), None), result);
    }

    /// Answer title lookups for `title` restricted to `media_type`.
    pub async fn add_typed(&self, title: &str, media_type: MediaType, result: EnrichmentResult) {
        self.by_title
            .write()
            .await
            .insert((title.to_lowercase(), Some(media_type)), result);
    }

    /// Get recorded lookups.
    pub async fn recorded_lookups(&self) -> Vec<RecordedLookup> {
        self.lookups.read().await.clone()
    }

    /// Get the number of lookups performed.
    pub async fn lookup_count(&self) -> usize {
        self.lookups.read().await.len()
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }

    /// Add simulated latency to every lookup.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Highest number of concurrent lookups observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn simulate(&self, lookup: RecordedLookup) -> Result<(), MetadataError> {
        self.lookups.write().await.push(lookup);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.next_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MetadataLookup for MockMetadata {
    fn name(&self) -> &str {
        "mock"
    }

    async fn by_id(&self, id: &str) -> Result<Option<EnrichmentResult>, MetadataError> {
        self.simulate(RecordedLookup::ById(id.to_string())).await?;
        Ok(self.by_id.read().await.get(id).cloned())
    }

    async fn by_title(
        &self,
        query: &TitleQuery,
    ) -> Result<Option<EnrichmentResult>, MetadataError> {
        self.simulate(RecordedLookup::ByTitle(query.clone())).await?;
        let key = (query.title.to_lowercase(), query.media_type);
        Ok(self.by_title.read().await.get(&key).cloned())
    }
}
