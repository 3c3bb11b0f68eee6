//! Per-entry enrichment strategy.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::metrics::ENRICHMENT_LOOKUPS;
use crate::release_name::{extract_series_name, looks_like_series};
use crate::source::Entry;

use super::{EnrichmentResult, MediaType, MetadataError, MetadataLookup, TitleQuery};

/// Applies the lookup strategy to single entries.
///
/// Strategy, stopping at the first match:
/// 1. by external id, when the entry carries one;
/// 2. by title and year, untyped (series titles are reduced to the show name);
/// 3. by title and year as a series, when the title looks like one.
///
/// Errors end the attempt for that entry only.
#[derive(Clone)]
pub struct Enricher {
    lookup: Arc<dyn MetadataLookup>,
}

impl Enricher {
    pub fn new(lookup: Arc<dyn MetadataLookup>) -> Self {
        Self { lookup }
    }

    /// Look up metadata for one entry. Never fails; errors yield `None`.
    pub async fn enrich(&self, entry: &Entry) -> Option<EnrichmentResult> {
        let outcome = self.try_enrich(entry).await;

        match outcome {
            Ok(Some(result)) => {
                ENRICHMENT_LOOKUPS.with_label_values(&["hit"]).inc();
                debug!(
                    title = %entry.title,
                    imdb_id = ?result.imdb_id,
                    votes = result.vote_count(),
                    "Enrichment matched"
                );
                Some(result)
            }
            Ok(None) => {
                ENRICHMENT_LOOKUPS.with_label_values(&["miss"]).inc();
                debug!(title = %entry.title, "No metadata match");
                None
            }
            Err(e) => {
                ENRICHMENT_LOOKUPS.with_label_values(&["error"]).inc();
                warn!(
                    service = self.lookup.name(),
                    title = %entry.title,
                    error = %e,
                    "Metadata lookup failed"
                );
                None
            }
        }
    }

    /// Look up by id only.
    pub async fn enrich_by_id(&self, id: &str) -> Option<EnrichmentResult> {
        match self.lookup.by_id(id).await {
            Ok(result) => result,
            Err(e) => {
                warn!(service = self.lookup.name(), id = id, error = %e, "Metadata lookup failed");
                None
            }
        }
    }

    async fn try_enrich(&self, entry: &Entry) -> Result<Option<EnrichmentResult>, MetadataError> {
        if let Some(id) = entry.imdb_code.as_deref().filter(|id| !id.is_empty()) {
            if let Some(result) = self.lookup.by_id(id).await? {
                return Ok(Some(result));
            }
        }

        let title = entry.title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let is_series = looks_like_series(title);
        let lookup_title = if is_series {
            extract_series_name(title)
        } else {
            title.to_string()
        };

        let query = TitleQuery::new(lookup_title, entry.year);
        if let Some(result) = self.lookup.by_title(&query).await? {
            return Ok(Some(result));
        }

        if is_series {
            return self
                .lookup
                .by_title(&query.with_type(MediaType::Series))
                .await;
        }

        Ok(None)
    }
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher")
            .field("lookup", &self.lookup.name())
            .finish()
    }
}
