use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::http::DEFAULT_TIMEOUT_SECS;
use crate::metadata::DEFAULT_METADATA_URL;
use crate::source::{SourceKind, DEFAULT_BATCH_SIZE, DEFAULT_CATALOG_URL, DEFAULT_INDEX_URL};

/// Root configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}

fn default_port() -> u16 {
    8000
}

/// Search defaults and limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Source used when a request does not name one.
    #[serde(default)]
    pub default_source: SourceKind,
    /// Page size used when a request does not give one.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Upper bound for requested page sizes.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// Timeout for every outbound request, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_source: SourceKind::default(),
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Source endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

/// Catalog source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
        }
    }
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

/// Index source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_url")]
    pub base_url: String,
    /// Hits fetched per query; pages are sliced out of this batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            base_url: default_index_url(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_index_url() -> String {
    DEFAULT_INDEX_URL.to_string()
}

fn default_batch_size() -> u32 {
    DEFAULT_BATCH_SIZE
}

/// Metadata enrichment configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// OMDb API key. Empty disables enrichment.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_metadata_url")]
    pub base_url: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_metadata_url(),
        }
    }
}

impl MetadataConfig {
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

fn default_metadata_url() -> String {
    DEFAULT_METADATA_URL.to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub sources: SourcesConfig,
    pub metadata: SanitizedMetadataConfig,
}

/// Sanitized metadata config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMetadataConfig {
    pub base_url: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            search: config.search.clone(),
            sources: config.sources.clone(),
            metadata: SanitizedMetadataConfig {
                base_url: config.metadata.base_url.clone(),
                api_key_configured: config.metadata.is_enabled(),
            },
        }
    }
}
