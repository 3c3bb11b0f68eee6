//! Best-effort metadata enrichment (OMDb-style API).
//!
//! A [`MetadataLookup`] answers id and title lookups; the [`Enricher`]
//! applies the lookup strategy to one entry and swallows failures.

mod enricher;
mod omdb;
mod types;

pub use enricher::Enricher;
pub use omdb::{OmdbClient, DEFAULT_METADATA_URL};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying the metadata service.
///
/// "No match" is not an error; lookups return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing or rejected API key).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for metadata lookup clients.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Service name, for logs and metrics.
    fn name(&self) -> &str;

    /// Look up by external identifier (e.g. "tt1375666").
    async fn by_id(&self, id: &str) -> Result<Option<EnrichmentResult>, MetadataError>;

    /// Look up by title, optional year and optional media type.
    async fn by_title(&self, query: &TitleQuery)
        -> Result<Option<EnrichmentResult>, MetadataError>;
}
