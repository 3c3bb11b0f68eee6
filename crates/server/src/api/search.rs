//! Search and details handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use marquee_core::{Entry, SearchError, SearchPage, SourceError, SourceKind};

use super::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Map a search failure onto a status code.
///
/// "No results" is a 200 with no entries, never an error status.
pub(crate) fn search_error_status(error: &SearchError) -> StatusCode {
    match error {
        SearchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        SearchError::Source(SourceError::Unsupported(_)) => StatusCode::BAD_REQUEST,
        SearchError::Source(SourceError::NotFound(_)) => StatusCode::NOT_FOUND,
        SearchError::Source(SourceError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
        SearchError::Source(_) => StatusCode::BAD_GATEWAY,
    }
}

/// GET /api/v1/search?q=&source=&page=&page_size=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchPage>, (StatusCode, Json<ErrorResponse>)> {
    let aggregator = state.aggregator();
    let settings = aggregator.settings();

    let source = match params.source.as_deref() {
        Some(s) if !s.trim().is_empty() => s
            .parse::<SourceKind>()
            .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.to_string()))?,
        _ => settings.default_source,
    };
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(settings.default_page_size);

    aggregator
        .search(&params.q, page, page_size, source)
        .await
        .map(Json)
        .map_err(|e| error_response(search_error_status(&e), e.to_string()))
}

/// GET /api/v1/movies/{id}
///
/// Catalog details for one movie, enriched when metadata is configured.
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Entry>, (StatusCode, Json<ErrorResponse>)> {
    state
        .aggregator()
        .details(&id)
        .await
        .map(Json)
        .map_err(|e| error_response(search_error_status(&e), e.to_string()))
}
