//! Search orchestration: fetch, enrich, rank, paginate.

mod rank;

pub use rank::rank_by_votes;

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, SearchConfig};
use crate::metadata::{Enricher, OmdbClient};
use crate::metrics::{SEARCHES_TOTAL, SEARCH_RESULTS};
use crate::source::{
    CatalogSource, Entry, IndexSource, SearchPage, Source, SourceError, SourceKind,
};

/// Errors that can occur during a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Source failed: {0}")]
    Source(#[from] SourceError),
}

/// Search defaults and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub default_source: SourceKind,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            default_source: config.default_source,
            default_page_size: config.page_size,
            max_page_size: config.max_page_size,
        }
    }
}

/// Runs searches against the configured sources.
///
/// Holds no per-search state; concurrent searches are independent.
pub struct Aggregator {
    catalog: Arc<dyn Source>,
    index: Arc<dyn Source>,
    enricher: Option<Enricher>,
    settings: SearchSettings,
}

impl Aggregator {
    pub fn new(
        catalog: Arc<dyn Source>,
        index: Arc<dyn Source>,
        enricher: Option<Enricher>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            catalog,
            index,
            enricher,
            settings,
        }
    }

    /// Build the real sources from configuration, sharing one HTTP client.
    ///
    /// Enrichment is enabled only when a metadata API key is configured.
    pub fn from_config(config: &Config, client: Client) -> Self {
        let catalog = CatalogSource::new(client.clone(), config.sources.catalog.base_url.clone());
        let index = IndexSource::new(
            client.clone(),
            config.sources.index.base_url.clone(),
            config.sources.index.batch_size,
        );

        let enricher = if config.metadata.is_enabled() {
            match OmdbClient::new(
                client,
                config.metadata.base_url.clone(),
                config.metadata.api_key.clone(),
            ) {
                Ok(omdb) => Some(Enricher::new(Arc::new(omdb))),
                Err(e) => {
                    warn!(error = %e, "Metadata enrichment disabled");
                    None
                }
            }
        } else {
            None
        };

        Self::new(
            Arc::new(catalog),
            Arc::new(index),
            enricher,
            SearchSettings::from(&config.search),
        )
    }

    pub fn settings(&self) -> SearchSettings {
        self.settings
    }

    pub fn enrichment_enabled(&self) -> bool {
        self.enricher.is_some()
    }

    fn source(&self, kind: SourceKind) -> &dyn Source {
        match kind {
            SourceKind::Catalog => self.catalog.as_ref(),
            SourceKind::Index => self.index.as_ref(),
        }
    }

    /// Clamp a requested page size into `[1, max_page_size]`.
    pub fn clamp_page_size(&self, page_size: u32) -> u32 {
        page_size.clamp(1, self.settings.max_page_size.max(1))
    }

    /// Search one source and return a ranked page.
    ///
    /// A source failure fails the whole call; enrichment failures only leave
    /// the affected entries without metadata.
    pub async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
        source: SourceKind,
    ) -> Result<SearchPage, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidRequest(
                "query must not be empty".to_string(),
            ));
        }
        let page = page.max(1);
        let page_size = self.clamp_page_size(page_size);
        let start = Instant::now();

        debug!(query = query, source = %source, page, page_size, "Starting search");

        let fetched = match self.source(source).fetch(query, page, page_size).await {
            Ok(fetched) => fetched,
            Err(e) => {
                SEARCHES_TOTAL
                    .with_label_values(&[source.as_str(), "error"])
                    .inc();
                warn!(query = query, source = %source, error = %e, "Search failed");
                return Err(e.into());
            }
        };

        let mut entries = fetched.entries;
        if let Some(enricher) = &self.enricher {
            enrich_all(enricher, &mut entries).await;
        }
        rank_by_votes(&mut entries);

        let status = if entries.is_empty() { "empty" } else { "success" };
        SEARCHES_TOTAL
            .with_label_values(&[source.as_str(), status])
            .inc();
        SEARCH_RESULTS
            .with_label_values(&[source.as_str()])
            .observe(entries.len() as f64);

        info!(
            query = query,
            source = %source,
            page,
            results = entries.len(),
            total = fetched.total,
            duration_ms = elapsed_ms(start),
            "Search complete"
        );

        Ok(SearchPage::new(entries, page, page_size, fetched.total, source))
    }

    /// Fetch one catalog entry, enriched by its external id when possible.
    pub async fn details(&self, id: &str) -> Result<Entry, SearchError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(SearchError::InvalidRequest("id must not be empty".to_string()));
        }
        let start = Instant::now();

        let mut entry = self.catalog.details(id).await?;

        if let (Some(enricher), Some(imdb_id)) = (&self.enricher, entry.imdb_code.clone()) {
            if let Some(result) = enricher.enrich_by_id(&imdb_id).await {
                entry.attach_metadata(result);
            }
        }

        info!(
            id = id,
            title = %entry.title,
            enriched = entry.metadata.is_some(),
            duration_ms = elapsed_ms(start),
            "Details fetched"
        );

        Ok(entry)
    }
}

/// Enrich every entry concurrently, one future per entry.
///
/// Each future produces the result for its own index; results are written
/// back only after all of them finish.
async fn enrich_all(enricher: &Enricher, entries: &mut [Entry]) {
    if entries.is_empty() {
        return;
    }

    let lookups = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| async move { (idx, enricher.enrich(entry).await) });
    let results = join_all(lookups).await;

    let mut matched = 0;
    for (idx, result) in results {
        if let Some(result) = result {
            entries[idx].attach_metadata(result);
            matched += 1;
        }
    }

    debug!(entries = entries.len(), matched, "Enrichment complete");
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("enricher", &self.enricher)
            .field("settings", &self.settings)
            .finish()
    }
}
