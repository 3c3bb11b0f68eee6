//! Variant selection, magnet links and torrent file downloads.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use marquee_core::{
    build_magnet, select_best, torrent_file_name, FetchError, SourceError, Variant,
};

use super::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

const TORRENT_CONTENT_TYPE: &str = "application/x-bittorrent";

#[derive(Debug, Deserialize)]
pub struct SelectBestRequest {
    #[serde(default)]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Deserialize)]
pub struct MagnetParams {
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct MagnetResponse {
    pub magnet: String,
}

#[derive(Debug, Deserialize)]
pub struct TorrentFileParams {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
}

/// POST /api/v1/select-best
///
/// Pick the highest-scoring variant. 404 when the list is empty.
pub async fn select_best_variant(
    Json(body): Json<SelectBestRequest>,
) -> Result<Json<Variant>, (StatusCode, Json<ErrorResponse>)> {
    select_best(&body.variants)
        .cloned()
        .map(Json)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "No variants to choose from"))
}

/// GET /api/v1/magnet?hash=&name=
pub async fn magnet(
    Query(params): Query<MagnetParams>,
) -> Result<Json<MagnetResponse>, (StatusCode, Json<ErrorResponse>)> {
    let hash = params.hash.trim();
    if hash.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "hash must not be empty",
        ));
    }

    Ok(Json(MagnetResponse {
        magnet: build_magnet(hash, params.name.trim()),
    }))
}

/// GET /api/v1/torrent-file?url=&title=&quality=
///
/// Downloads the `.torrent` and hands it back as an attachment. Only URLs on
/// the configured catalog's host are fetched (403 otherwise), so this is not
/// a general-purpose proxy.
pub async fn torrent_file(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TorrentFileParams>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let fetched = state
        .fetcher()
        .fetch(&params.url)
        .await
        .map_err(|e| {
            warn!(url = %params.url, error = %e, "Torrent download failed");
            error_response(fetch_error_status(&e), e.to_string())
        })?;

    let title = params
        .title
        .filter(|t| !t.trim().is_empty())
        .or(fetched.name)
        .unwrap_or_else(|| fetched.info_hash.clone());
    let quality = params.quality.unwrap_or_default();
    let file_name = torrent_file_name(title.trim(), quality.trim());

    info!(
        info_hash = %fetched.info_hash,
        file_name = %file_name,
        bytes = fetched.bytes.len(),
        "Torrent file served"
    );

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"download.torrent\""));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(TORRENT_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        fetched.bytes,
    )
        .into_response())
}

fn fetch_error_status(error: &FetchError) -> StatusCode {
    match error {
        FetchError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        FetchError::HostNotAllowed(_) => StatusCode::FORBIDDEN,
        FetchError::Source(SourceError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
        FetchError::Source(_) | FetchError::InvalidTorrent(_) => StatusCode::BAD_GATEWAY,
    }
}
