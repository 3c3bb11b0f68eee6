//! `.torrent` file download and validation.
//!
//! Uses librqbit-core to parse the bencoded payload, both to confirm it is a
//! torrent and to report its info hash. Writing the bytes anywhere is the
//! caller's job.

use std::time::Instant;

use librqbit_core::torrent_metainfo::{torrent_from_bytes, TorrentMetaV1Owned};
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

use crate::http::{classify_error, ensure_success};
use crate::metrics;
use crate::source::SourceError;

/// Errors that can occur when fetching a torrent file.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Invalid torrent file: {0}")]
    InvalidTorrent(String),

    #[error("Host not allowed: {0}")]
    HostNotAllowed(String),
}

/// A downloaded and parsed `.torrent` file.
#[derive(Debug, Clone)]
pub struct FetchedTorrent {
    /// Raw bencoded bytes, as downloaded.
    pub bytes: Vec<u8>,
    /// Lowercase hex info hash.
    pub info_hash: String,
    /// Torrent name from the info dictionary, if present.
    pub name: Option<String>,
}

/// Downloads `.torrent` files over the shared HTTP client.
///
/// Unrestricted by default. A fetcher built with [`TorrentFetcher::for_catalog`]
/// only downloads from the catalog's own host.
#[derive(Debug, Clone)]
pub struct TorrentFetcher {
    client: Client,
    allowed_hosts: Option<Vec<String>>,
}

impl TorrentFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            allowed_hosts: None,
        }
    }

    /// Restrict downloads to the host of the catalog base URL.
    ///
    /// A base URL without a host allows nothing.
    pub fn for_catalog(client: Client, catalog_base_url: &str) -> Self {
        let hosts = Url::parse(catalog_base_url.trim())
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
            .into_iter()
            .collect();
        Self::new(client).allow_only(hosts)
    }

    /// Only download from these hosts.
    pub fn allow_only(mut self, hosts: Vec<String>) -> Self {
        self.allowed_hosts = Some(hosts.into_iter().map(|h| h.to_ascii_lowercase()).collect());
        self
    }

    /// Download and parse a torrent file. Only http(s) URLs on an allowed
    /// host are accepted.
    pub async fn fetch(&self, url: &str) -> Result<FetchedTorrent, FetchError> {
        let url = parse_url(url)?;
        self.check_host(&url)?;
        debug!(url = %url, "Downloading torrent file");

        let start = Instant::now();
        let result = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(classify_error)?;
            let response = ensure_success(response).await?;
            response.bytes().await.map_err(classify_error)
        }
        .await;
        metrics::record_external_call("torrent_file", "download", start, result.is_ok());

        parse_torrent(result?.to_vec())
    }

    fn check_host(&self, url: &Url) -> Result<(), FetchError> {
        let Some(allowed) = &self.allowed_hosts else {
            return Ok(());
        };
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        if allowed.iter().any(|h| *h == host) {
            Ok(())
        } else {
            Err(FetchError::HostNotAllowed(host))
        }
    }
}

fn parse_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

/// Parse bencoded torrent bytes.
pub(crate) fn parse_torrent(bytes: Vec<u8>) -> Result<FetchedTorrent, FetchError> {
    let (info_hash, name) = {
        let torrent: TorrentMetaV1Owned = torrent_from_bytes(&bytes)
            .map_err(|e| FetchError::InvalidTorrent(e.to_string()))?;
        let name = torrent
            .info
            .name
            .as_ref()
            .map(|b| String::from_utf8_lossy(b.as_ref()).into_owned());
        (torrent.info_hash.as_string(), name)
    };

    Ok(FetchedTorrent {
        bytes,
        info_hash,
        name,
    })
}
