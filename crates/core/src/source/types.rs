//! Types for the search sources.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metadata::EnrichmentResult;

/// Which adapter produced an entry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Curated, ID-addressable movie catalog (YTS-style API).
    #[default]
    Catalog,
    /// Free-text torrent-name index (Torrents-CSV-style API).
    Index,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Catalog => "catalog",
            SourceKind::Index => "index",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown source: {0} (expected 'catalog' or 'index')")]
pub struct UnknownSourceError(pub String);

impl FromStr for SourceKind {
    type Err = UnknownSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "catalog" | "yts" => Ok(SourceKind::Catalog),
            "index" | "torrents-csv" | "tcsv" => Ok(SourceKind::Index),
            other => Err(UnknownSourceError(other.to_string())),
        }
    }
}

/// One downloadable rendition of an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Variant {
    /// Resolution or rendition label ("1080p", "720p", "Full").
    pub quality_label: String,
    /// Release type reported by the catalog ("bluray", "web").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Human-readable size.
    pub size_label: String,
    pub seed_count: u32,
    pub peer_count: u32,
    /// Info hash, as reported by the source.
    pub content_hash: String,
    /// Direct `.torrent` download URL, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// A normalized, source-agnostic search result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    /// Catalog identifier. Empty for index entries.
    pub id: String,
    /// Display title, cleaned of release tags.
    pub title: String,
    /// Release year, 0 when unknown.
    pub year: u32,
    pub rating: f32,
    /// Runtime in minutes, 0 when unknown.
    pub runtime: u32,
    pub genres: Vec<String>,
    pub summary: String,
    /// IMDb identifier used for id-based enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_code: Option<String>,
    pub variants: Vec<Variant>,
    pub source: SourceKind,
    /// Info hash of index entries. Empty for catalog entries.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub infohash: String,
    #[serde(default)]
    pub seeders: u32,
    #[serde(default)]
    pub leechers: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub size_label: String,
    /// Enrichment result, once a lookup has matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EnrichmentResult>,
}

impl Entry {
    /// Vote count used for ranking. Zero without metadata.
    pub fn vote_count(&self) -> u64 {
        self.metadata.as_ref().map(|m| m.vote_count()).unwrap_or(0)
    }

    /// Attach an enrichment result, adopting its IMDb id if the entry has none.
    pub fn attach_metadata(&mut self, metadata: EnrichmentResult) {
        if self.imdb_code.is_none() {
            self.imdb_code = metadata.imdb_id.clone();
        }
        self.metadata = Some(metadata);
    }
}

/// One page of entries as returned by a source adapter.
#[derive(Debug, Clone, Default)]
pub struct SourcePage {
    pub entries: Vec<Entry>,
    /// Total matches reported (catalog) or fetched (index).
    pub total: usize,
}

/// Result of one search call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub entries: Vec<Entry>,
    pub page: u32,
    pub page_size: u32,
    pub total: usize,
    pub total_pages: u32,
    pub source: SourceKind,
}

impl SearchPage {
    pub fn new(
        entries: Vec<Entry>,
        page: u32,
        page_size: u32,
        total: usize,
        source: SourceKind,
    ) -> Self {
        Self {
            entries,
            page,
            page_size,
            total,
            total_pages: total_pages(total, page_size),
            source,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `ceil(total / page_size)`, never less than 1.
pub fn total_pages(total: usize, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total.div_ceil(page_size as usize);
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// Errors that can occur while fetching from a source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl SourceError {
    /// Network failure, timeout or non-2xx status.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SourceError::Timeout | SourceError::ConnectionFailed(_) | SourceError::HttpStatus { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(30, 50), 1);
        assert_eq!(total_pages(200, 50), 4);
    }

    #[test]
    fn test_total_pages_zero_page_size() {
        assert_eq!(total_pages(100, 0), 1);
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!("catalog".parse::<SourceKind>().unwrap(), SourceKind::Catalog);
        assert_eq!("YTS".parse::<SourceKind>().unwrap(), SourceKind::Catalog);
        assert_eq!("index".parse::<SourceKind>().unwrap(), SourceKind::Index);
        assert_eq!("torrents-csv".parse::<SourceKind>().unwrap(), SourceKind::Index);
        assert_eq!("tcsv".parse::<SourceKind>().unwrap(), SourceKind::Index);
        assert!("piratebay".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_source_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&SourceKind::Catalog).unwrap(),
            "\"catalog\""
        );
        assert_eq!(serde_json::to_string(&SourceKind::Index).unwrap(), "\"index\"");
    }

    #[test]
    fn test_vote_count_without_metadata() {
        let entry = Entry::default();
        assert_eq!(entry.vote_count(), 0);
    }

    #[test]
    fn test_attach_metadata_adopts_imdb_id() {
        let mut entry = Entry {
            title: "Inception".to_string(),
            ..Default::default()
        };
        entry.attach_metadata(EnrichmentResult {
            imdb_id: Some("tt1375666".to_string()),
            votes: Some("2,500,000".to_string()),
            ..Default::default()
        });

        assert_eq!(entry.imdb_code.as_deref(), Some("tt1375666"));
        assert_eq!(entry.vote_count(), 2_500_000);
    }

    #[test]
    fn test_attach_metadata_keeps_existing_imdb_id() {
        let mut entry = Entry {
            imdb_code: Some("tt0000001".to_string()),
            ..Default::default()
        };
        entry.attach_metadata(EnrichmentResult {
            imdb_id: Some("tt9999999".to_string()),
            ..Default::default()
        });

        assert_eq!(entry.imdb_code.as_deref(), Some("tt0000001"));
    }

    #[test]
    fn test_search_page_new_computes_pages() {
        let page = SearchPage::new(vec![], 2, 50, 30, SourceKind::Index);
        assert!(page.is_empty());
        assert_eq!(page.total, 30);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_transport_classification() {
        assert!(SourceError::Timeout.is_transport());
        assert!(SourceError::HttpStatus {
            status: 502,
            message: String::new()
        }
        .is_transport());
        assert!(!SourceError::Decode("bad".to_string()).is_transport());
    }
}
