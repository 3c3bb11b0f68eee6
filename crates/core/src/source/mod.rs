//! Search sources.
//!
//! Each source fetches raw results from one external service and normalizes
//! them into [`Entry`] values. The catalog paginates server-side; the index
//! returns one fixed-size batch that is sliced locally.

mod catalog;
mod index;
mod types;

pub use catalog::{CatalogSource, DEFAULT_CATALOG_URL};
pub use index::{local_page, IndexSource, DEFAULT_BATCH_SIZE, DEFAULT_INDEX_URL};
pub use types::*;

use async_trait::async_trait;

/// Trait for search sources.
#[async_trait]
pub trait Source: Send + Sync {
    /// Which kind of source this is.
    fn kind(&self) -> SourceKind;

    /// Fetch one page of results for a free-text query.
    ///
    /// `page` is 1-based. The returned `total` is the number of matches the
    /// source knows about, not the length of this page.
    async fn fetch(&self, query: &str, page: u32, page_size: u32)
        -> Result<SourcePage, SourceError>;

    /// Fetch a single entry by its source identifier.
    async fn details(&self, id: &str) -> Result<Entry, SourceError> {
        Err(SourceError::Unsupported(format!(
            "{} source does not support details lookup (id {})",
            self.kind(),
            id
        )))
    }
}
