//! OMDb API client.
//!
//! OMDb requires an API key for access. A lookup answers with
//! `"Response": "False"` when nothing matches; that is reported as `None`.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::metrics;

use super::types::non_placeholder;
use super::{EnrichmentResult, MediaType, MetadataError, MetadataLookup, TitleQuery};

/// Default metadata API base URL.
pub const DEFAULT_METADATA_URL: &str = "http://www.omdbapi.com";

/// OMDb API client.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmdbClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OmdbClient {
    /// Create a new client. Fails when the API key is empty.
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, MetadataError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(MetadataError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    fn id_params(&self, id: &str) -> Vec<(&'static str, String)> {
        vec![("i", id.to_string()), ("apikey", self.api_key.clone())]
    }

    fn title_params(&self, query: &TitleQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![("t", query.title.clone())];
        if let Some(year) = query.year {
            params.push(("y", year.to_string()));
        }
        if let Some(media_type) = query.media_type {
            params.push(("type", media_type.as_str().to_string()));
        }
        params.push(("apikey", self.api_key.clone()));
        params
    }

    async fn lookup(
        &self,
        params: &[(&'static str, String)],
        operation: &str,
    ) -> Result<Option<EnrichmentResult>, MetadataError> {
        let start = Instant::now();
        let result = self.send(params).await;
        metrics::record_external_call("metadata", operation, start, result.is_ok());
        result
    }

    async fn send(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<Option<EnrichmentResult>, MetadataError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(MetadataError::NotConfigured(
                "Invalid OMDb API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body: OmdbResponse = response.json().await.map_err(|e| {
            MetadataError::ParseError(format!("Failed to parse OMDb response: {}", e))
        })?;

        Ok(body.into_result())
    }
}

#[async_trait]
impl MetadataLookup for OmdbClient {
    fn name(&self) -> &str {
        "omdb"
    }

    async fn by_id(&self, id: &str) -> Result<Option<EnrichmentResult>, MetadataError> {
        debug!(id = id, "OMDb lookup by id");
        self.lookup(&self.id_params(id), "by_id").await
    }

    async fn by_title(
        &self,
        query: &TitleQuery,
    ) -> Result<Option<EnrichmentResult>, MetadataError> {
        debug!(
            title = %query.title,
            year = ?query.year,
            media_type = ?query.media_type,
            "OMDb lookup by title"
        );
        self.lookup(&self.title_params(query), "by_title").await
    }
}

/// OMDb response body.
#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Rated", default)]
    rated: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "imdbVotes", default)]
    imdb_votes: String,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Type", default)]
    media_type: String,
    #[serde(rename = "totalSeasons", default)]
    total_seasons: String,
}

impl OmdbResponse {
    fn into_result(self) -> Option<EnrichmentResult> {
        if self.response.eq_ignore_ascii_case("false") {
            debug!(error = ?self.error, "OMDb reported no match");
            return None;
        }

        Some(EnrichmentResult {
            title: self.title,
            year: non_placeholder(self.year),
            rated: non_placeholder(self.rated),
            runtime: non_placeholder(self.runtime),
            genre: non_placeholder(self.genre),
            director: non_placeholder(self.director),
            actors: non_placeholder(self.actors),
            plot: non_placeholder(self.plot),
            rating: non_placeholder(self.imdb_rating),
            votes: non_placeholder(self.imdb_votes),
            imdb_id: non_placeholder(self.imdb_id),
            media_type: MediaType::parse(&self.media_type),
            total_seasons: non_placeholder(self.total_seasons),
        })
    }
}
