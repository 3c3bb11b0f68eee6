//! Testing utilities and mock implementations.
//!
//! Mocks for the source and metadata traits, so the aggregator can be
//! exercised end to end without the network.
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_core::testing::{fixtures, MockMetadata, MockSource};
//! use marquee_core::SourceKind;
//!
//! let catalog = MockSource::new(SourceKind::Catalog);
//! catalog.set_entries(vec![fixtures::catalog_entry("1", "Inception", 2010)]).await;
//!
//! let metadata = MockMetadata::new();
//! metadata.add_by_id("tt1375666", fixtures::enrichment("Inception", "tt1375666", "2,500,000")).await;
//! ```

mod mock_metadata;
mod mock_source;

pub use mock_metadata::{MockMetadata, RecordedLookup};
pub use mock_source::{MockSource, RecordedFetch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::metadata::{EnrichmentResult, MediaType};
    use crate::source::{Entry, SourceKind, Variant};

    /// Create a variant with the given quality and seed count.
    pub fn variant(quality: &str, seeds: u32) -> Variant {
        Variant {
            quality_label: quality.to_string(),
            kind: Some("bluray".to_string()),
            size_label: "1.50 GB".to_string(),
            seed_count: seeds,
            peer_count: seeds / 10,
            content_hash: format!("{}{:08x}", quality, seeds),
            file_url: Some(format!("https://catalog.test/torrent/{}-{}", quality, seeds)),
        }
    }

    /// Create a catalog entry with 720p and 1080p variants.
    pub fn catalog_entry(id: &str, title: &str, year: u32) -> Entry {
        Entry {
            id: id.to_string(),
            title: title.to_string(),
            year,
            rating: 7.5,
            runtime: 120,
            genres: vec!["Drama".to_string()],
            summary: format!("A movie about {}.", title.to_lowercase()),
            imdb_code: None,
            variants: vec![variant("720p", 40), variant("1080p", 25)],
            source: SourceKind::Catalog,
            ..Default::default()
        }
    }

    /// Create an index entry with the synthesized "Full" variant.
    pub fn index_entry(title: &str, year: u32, infohash: &str) -> Entry {
        Entry {
            title: title.to_string(),
            year,
            variants: vec![Variant {
                quality_label: "Full".to_string(),
                kind: None,
                size_label: "700.00 MB".to_string(),
                seed_count: 12,
                peer_count: 3,
                content_hash: infohash.to_string(),
                file_url: None,
            }],
            source: SourceKind::Index,
            infohash: infohash.to_string(),
            seeders: 12,
            leechers: 3,
            size_label: "700.00 MB".to_string(),
            ..Default::default()
        }
    }

    /// Create a movie enrichment result.
    pub fn enrichment(title: &str, imdb_id: &str, votes: &str) -> EnrichmentResult {
        EnrichmentResult {
            title: title.to_string(),
            year: Some("2010".to_string()),
            rated: Some("PG-13".to_string()),
            runtime: Some("120 min".to_string()),
            genre: Some("Drama".to_string()),
            director: Some("Jane Doe".to_string()),
            actors: Some("Actor One, Actor Two".to_string()),
            plot: Some(format!("The story of {}.", title)),
            rating: Some("7.9".to_string()),
            votes: Some(votes.to_string()),
            imdb_id: Some(imdb_id.to_string()),
            media_type: Some(MediaType::Movie),
            total_seasons: None,
        }
    }
}
