//! Curated movie catalog source (YTS-style API).

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::http::{classify_error, decode_json, ensure_success};
use crate::metrics;

use super::{Entry, Source, SourceError, SourceKind, SourcePage, Variant};

/// Default catalog API base URL.
pub const DEFAULT_CATALOG_URL: &str = "https://yts.bz/api/v2";

/// Catalog source. Pagination happens server-side.
pub struct CatalogSource {
    client: Client,
    base_url: String,
}

impl CatalogSource {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn build_list_url(&self, query: &str, page: u32, limit: u32) -> String {
        format!(
            "{}/list_movies.json?query_term={}&limit={}&page={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            limit,
            page
        )
    }

    fn build_details_url(&self, id: &str) -> String {
        format!(
            "{}/movie_details.json?movie_id={}&with_images=true&with_cast=true",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(id)
        )
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        operation: &str,
    ) -> Result<T, SourceError> {
        let start = Instant::now();
        let result = async {
            let response = self.client.get(url).send().await.map_err(classify_error)?;
            let response = ensure_success(response).await?;
            decode_json(response).await
        }
        .await;
        metrics::record_external_call("catalog", operation, start, result.is_ok());
        result
    }
}

#[async_trait]
impl Source for CatalogSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Catalog
    }

    async fn fetch(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SourcePage, SourceError> {
        let url = self.build_list_url(query, page.max(1), page_size);
        debug!(url = %url, "Searching catalog");

        let response: ListResponse = self.get(&url, "list_movies").await?;
        page_from_response(response)
    }

    async fn details(&self, id: &str) -> Result<Entry, SourceError> {
        let url = self.build_details_url(id);
        debug!(url = %url, "Fetching catalog details");

        let response: DetailResponse = self.get(&url, "movie_details").await?;
        entry_from_details(response, id)
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListResponse {
    status: String,
    #[serde(default)]
    status_message: String,
    data: Option<ListData>,
}

#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(default)]
    movie_count: usize,
    #[serde(default)]
    movies: Option<Vec<CatalogMovie>>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    status: String,
    #[serde(default)]
    status_message: String,
    data: Option<DetailData>,
}

#[derive(Debug, Deserialize)]
struct DetailData {
    movie: Option<CatalogMovie>,
}

#[derive(Debug, Deserialize)]
struct CatalogMovie {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    year: u32,
    #[serde(default)]
    rating: f32,
    #[serde(default)]
    runtime: u32,
    #[serde(default)]
    genres: Option<Vec<String>>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description_full: String,
    #[serde(default)]
    imdb_code: String,
    #[serde(default)]
    torrents: Option<Vec<CatalogTorrent>>,
}

#[derive(Debug, Deserialize)]
struct CatalogTorrent {
    #[serde(default)]
    url: String,
    #[serde(default)]
    hash: String,
    #[serde(default)]
    quality: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    size: String,
    #[serde(default)]
    seeds: u32,
    #[serde(default)]
    peers: u32,
}

fn check_status(status: &str, message: &str) -> Result<(), SourceError> {
    if status == "ok" {
        Ok(())
    } else {
        Err(SourceError::Decode(format!(
            "catalog returned status '{}': {}",
            status, message
        )))
    }
}

fn page_from_response(response: ListResponse) -> Result<SourcePage, SourceError> {
    check_status(&response.status, &response.status_message)?;

    let Some(data) = response.data else {
        return Ok(SourcePage::default());
    };

    let entries: Vec<Entry> = data
        .movies
        .unwrap_or_default()
        .into_iter()
        .filter_map(movie_to_entry)
        .collect();

    debug!(
        count = entries.len(),
        total = data.movie_count,
        "Catalog page parsed"
    );

    Ok(SourcePage {
        entries,
        total: data.movie_count,
    })
}

fn entry_from_details(response: DetailResponse, id: &str) -> Result<Entry, SourceError> {
    check_status(&response.status, &response.status_message)?;

    response
        .data
        .and_then(|d| d.movie)
        .filter(|m| m.id != 0)
        .and_then(movie_to_entry)
        .ok_or_else(|| SourceError::NotFound(format!("catalog movie {}", id)))
}

/// Normalize a catalog movie. Movies without any torrent are dropped.
fn movie_to_entry(movie: CatalogMovie) -> Option<Entry> {
    let variants: Vec<Variant> = movie
        .torrents
        .unwrap_or_default()
        .into_iter()
        .map(|t| Variant {
            quality_label: t.quality,
            kind: Some(t.kind).filter(|k| !k.is_empty()),
            size_label: t.size,
            seed_count: t.seeds,
            peer_count: t.peers,
            content_hash: t.hash,
            file_url: Some(t.url).filter(|u| !u.is_empty()),
        })
        .collect();

    if variants.is_empty() {
        debug!(id = movie.id, title = %movie.title, "Dropping catalog movie without torrents");
        return None;
    }

    let summary = if movie.summary.trim().is_empty() {
        movie.description_full
    } else {
        movie.summary
    };

    Some(Entry {
        id: movie.id.to_string(),
        title: movie.title.trim().to_string(),
        year: movie.year,
        rating: movie.rating,
        runtime: movie.runtime,
        genres: movie.genres.unwrap_or_default(),
        summary,
        imdb_code: Some(movie.imdb_code).filter(|c| !c.is_empty()),
        variants,
        source: SourceKind::Catalog,
        ..Default::default()
    })
}
