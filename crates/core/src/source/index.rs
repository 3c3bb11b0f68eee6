//! Torrent-name index source (Torrents-CSV-style API).
//!
//! The endpoint has no page cursor: one call returns up to `batch_size`
//! hits. The batch is normalized and sliced locally, so pages past the
//! batch are empty.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::http::{classify_error, decode_json, ensure_success};
use crate::metrics;
use crate::release_name::{clean_display_title, extract_imdb_id, extract_year, format_size};

use super::{Entry, Source, SourceError, SourceKind, SourcePage, Variant};

/// Default index API URL.
pub const DEFAULT_INDEX_URL: &str = "https://torrents-csv.com/service/search";

/// Default number of hits fetched per query.
pub const DEFAULT_BATCH_SIZE: u32 = 200;

/// Quality label of the single variant synthesized for index hits.
const FULL_QUALITY: &str = "Full";

/// Index source. Fetches one batch and paginates locally.
pub struct IndexSource {
    client: Client,
    base_url: String,
    batch_size: u32,
}

impl IndexSource {
    pub fn new(client: Client, base_url: impl Into<String>, batch_size: u32) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            batch_size,
        }
    }

    fn build_search_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&size={}",
            self.base_url,
            urlencoding::encode(query),
            self.batch_size
        )
    }
}

#[async_trait]
impl Source for IndexSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Index
    }

    async fn fetch(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SourcePage, SourceError> {
        let url = self.build_search_url(query);
        debug!(url = %url, "Searching index");

        let start = Instant::now();
        let result: Result<IndexResponse, SourceError> = async {
            let response = self.client.get(&url).send().await.map_err(classify_error)?;
            let response = ensure_success(response).await?;
            decode_json(response).await
        }
        .await;
        metrics::record_external_call("index", "search", start, result.is_ok());

        Ok(page_from_batch(result?, page, page_size))
    }
}

#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(default)]
    torrents: Option<Vec<IndexHit>>,
}

#[derive(Debug, Deserialize)]
struct IndexHit {
    #[serde(default)]
    infohash: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    size_bytes: i64,
    #[serde(default)]
    seeders: i64,
    #[serde(default)]
    leechers: i64,
}

fn clamp_count(n: i64) -> u32 {
    u32::try_from(n.max(0)).unwrap_or(u32::MAX)
}

fn hit_to_entry(hit: IndexHit) -> Entry {
    let name = hit.name.trim();
    let title = match clean_display_title(name) {
        t if t.is_empty() => name.to_string(),
        t => t,
    };
    let infohash = hit.infohash.trim().to_ascii_lowercase();
    let size_label = format_size(u64::try_from(hit.size_bytes).unwrap_or(0));
    let seeders = clamp_count(hit.seeders);
    let leechers = clamp_count(hit.leechers);

    Entry {
        title,
        year: extract_year(name),
        imdb_code: extract_imdb_id(name),
        variants: vec![Variant {
            quality_label: FULL_QUALITY.to_string(),
            kind: None,
            size_label: size_label.clone(),
            seed_count: seeders,
            peer_count: leechers,
            content_hash: infohash.clone(),
            file_url: None,
        }],
        source: SourceKind::Index,
        infohash,
        seeders,
        leechers,
        size_label,
        ..Default::default()
    }
}

fn page_from_batch(response: IndexResponse, page: u32, page_size: u32) -> SourcePage {
    let all: Vec<Entry> = response
        .torrents
        .unwrap_or_default()
        .into_iter()
        .map(hit_to_entry)
        .collect();
    let total = all.len();

    debug!(fetched = total, page, page_size, "Index batch parsed");

    SourcePage {
        entries: local_page(all, page, page_size),
        total,
    }
}

/// Slice one page out of a locally held batch.
///
/// `page` is 1-based (0 is treated as 1). Both bounds are clamped to the
/// batch, so a page past the end is empty.
pub fn local_page<T>(items: Vec<T>, page: u32, page_size: u32) -> Vec<T> {
    let total = items.len();
    let page = page.max(1) as usize;
    let page_size = page_size as usize;

    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    items.into_iter().skip(start).take(end - start).collect()
}
