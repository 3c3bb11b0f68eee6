//! HTTP adapter tests against a local server.
//!
//! Each test serves canned upstream responses on a random local port:
//! - Index and catalog decoding, timeouts, error statuses and bad bodies
//! - OMDb hits, misses, key rejection and the typed series retry

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use marquee_core::{
    build_client, CatalogSource, Enricher, Entry, IndexSource, MediaType, MetadataError,
    MetadataLookup, OmdbClient, Source, SourceError, SourceKind, TitleQuery,
};

const API_KEY: &str = "test-key";

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client() -> reqwest::Client {
    build_client(Duration::from_secs(1)).unwrap()
}

/// Routes shared by the index and catalog tests.
fn upstream() -> Router {
    Router::new()
        .route(
            "/search",
            get(|| async {
                Json(json!({
                    "torrents": [
                        {"infohash": "AAAA", "name": "Heat.1995.1080p.BluRay.x264", "size_bytes": 2147483648u64, "seeders": 40, "leechers": 5},
                        {"infohash": "BBBB", "name": "Heat.1995.720p", "size_bytes": 1073741824u64, "seeders": 12, "leechers": 1}
                    ]
                }))
            }),
        )
        .route("/slow", get(slow))
        .route("/slow/list_movies.json", get(slow))
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        )
        .route("/garbage", get(|| async { "<html>not json</html>" }))
        .route(
            "/api/v2/list_movies.json",
            get(|| async {
                Json(json!({
                    "status": "ok",
                    "status_message": "Query was successful",
                    "data": {
                        "movie_count": 45,
                        "movies": [
                            {
                                "id": 10, "title": "Heat", "year": 1995, "rating": 8.3,
                                "runtime": 170, "genres": ["Crime"], "summary": "",
                                "description_full": "A group of professional bank robbers.",
                                "imdb_code": "tt0113277",
                                "torrents": [
                                    {"url": "http://catalog.test/torrent/10.torrent", "hash": "CCCC", "quality": "1080p", "type": "bluray", "size": "2.1 GB", "seeds": 90, "peers": 10}
                                ]
                            },
                            {"id": 11, "title": "Heat Wave", "year": 2011, "torrents": []}
                        ]
                    }
                }))
            }),
        )
        .route(
            "/api/v2/movie_details.json",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let movie = match params.get("movie_id").map(String::as_str) {
                    Some("10") => json!({
                        "id": 10, "title": "Heat", "year": 1995,
                        "torrents": [{"hash": "CCCC", "quality": "720p", "seeds": 30}]
                    }),
                    _ => json!({"id": 0}),
                };
                Json(json!({"status": "ok", "status_message": "", "data": {"movie": movie}}))
            }),
        )
        .route(
            "/error/list_movies.json",
            get(|| async {
                Json(json!({"status": "error", "status_message": "Invalid query"}))
            }),
        )
}

/// Answers well after the 1s client timeout.
async fn slow() -> Json<serde_json::Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({"status": "ok", "torrents": []}))
}

/// An OMDb lookalike. Knows "Heat" as a movie and "Show" only as a series.
async fn omdb(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("apikey").map(String::as_str) != Some(API_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"Response": "False", "Error": "Invalid API key!"})),
        )
            .into_response();
    }

    let title = params.get("t").map(String::as_str);
    let media_type = params.get("type").map(String::as_str);

    let body = match (params.get("i").map(String::as_str), title, media_type) {
        (Some("tt0113277"), _, _) | (None, Some("Heat"), _) => json!({
            "Title": "Heat", "Year": "1995", "imdbVotes": "712,000",
            "imdbID": "tt0113277", "Type": "movie", "Response": "True"
        }),
        (None, Some("Show"), Some("series")) => json!({
            "Title": "Show", "Year": "2015-2019", "imdbVotes": "1,234",
            "imdbID": "tt7654321", "Type": "series", "totalSeasons": "4", "Response": "True"
        }),
        (None, Some("Outage"), _) => {
            return (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response();
        }
        _ => json!({"Response": "False", "Error": "Movie not found!"}),
    };

    Json(body).into_response()
}

async fn spawn_omdb() -> String {
    spawn_server(Router::new().route("/", get(omdb))).await
}

#[tokio::test]
async fn test_index_fetch_over_http() {
    let base = spawn_server(upstream()).await;
    let source = IndexSource::new(client(), format!("{}/search", base), 200);

    let page = source.fetch("heat", 1, 20).await.unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.entries.len(), 2);
    assert_eq!(page.entries[0].source, SourceKind::Index);
    assert_eq!(page.entries[0].infohash, "aaaa");
    assert_eq!(page.entries[0].title, "Heat 1995");
    assert_eq!(page.entries[0].size_label, "2.00 GB");
    assert_eq!(page.entries[0].seeders, 40);
}

#[tokio::test]
async fn test_index_slow_upstream_times_out() {
    let base = spawn_server(upstream()).await;
    let source = IndexSource::new(client(), format!("{}/slow", base), 200);

    let err = source.fetch("heat", 1, 20).await.unwrap_err();

    assert!(matches!(err, SourceError::Timeout), "got {:?}", err);
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_index_error_status() {
    let base = spawn_server(upstream()).await;
    let source = IndexSource::new(client(), format!("{}/broken", base), 200);

    let err = source.fetch("heat", 1, 20).await.unwrap_err();

    match &err {
        SourceError::HttpStatus { status, message } => {
            assert_eq!(*status, 500);
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_index_non_json_body() {
    let base = spawn_server(upstream()).await;
    let source = IndexSource::new(client(), format!("{}/garbage", base), 200);

    let err = source.fetch("heat", 1, 20).await.unwrap_err();

    assert!(matches!(err, SourceError::Decode(_)), "got {:?}", err);
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_unreachable_upstream() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = IndexSource::new(client(), format!("http://{}/search", addr), 200);
    let err = source.fetch("heat", 1, 20).await.unwrap_err();

    assert!(matches!(err, SourceError::ConnectionFailed(_)), "got {:?}", err);
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_catalog_fetch_keeps_upstream_total() {
    let base = spawn_server(upstream()).await;
    let source = CatalogSource::new(client(), format!("{}/api/v2/", base));

    let page = source.fetch("heat", 1, 20).await.unwrap();

    // The movie without torrents is dropped; the total is the catalog's count.
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.total, 45);

    let heat = &page.entries[0];
    assert_eq!(heat.id, "10");
    assert_eq!(heat.source, SourceKind::Catalog);
    assert_eq!(heat.summary, "A group of professional bank robbers.");
    assert_eq!(heat.imdb_code.as_deref(), Some("tt0113277"));
    assert_eq!(heat.variants[0].quality_label, "1080p");
    assert_eq!(heat.variants[0].kind.as_deref(), Some("bluray"));
    assert_eq!(
        heat.variants[0].file_url.as_deref(),
        Some("http://catalog.test/torrent/10.torrent")
    );
}

#[tokio::test]
async fn test_catalog_details_over_http() {
    let base = spawn_server(upstream()).await;
    let source = CatalogSource::new(client(), format!("{}/api/v2", base));

    let entry = source.details("10").await.unwrap();
    assert_eq!(entry.title, "Heat");
    assert_eq!(entry.variants.len(), 1);
    assert_eq!(entry.variants[0].file_url, None);

    let err = source.details("99").await.unwrap_err();
    assert!(matches!(err, SourceError::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_catalog_error_status_field() {
    let base = spawn_server(upstream()).await;
    let source = CatalogSource::new(client(), format!("{}/error", base));

    let err = source.fetch("heat", 1, 20).await.unwrap_err();

    match err {
        SourceError::Decode(message) => assert!(message.contains("Invalid query")),
        other => panic!("expected Decode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_catalog_slow_upstream_times_out() {
    let base = spawn_server(upstream()).await;
    let source = CatalogSource::new(client(), format!("{}/slow", base));

    let err = source.fetch("heat", 1, 20).await.unwrap_err();

    assert!(matches!(err, SourceError::Timeout), "got {:?}", err);
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_catalog_missing_route() {
    let base = spawn_server(upstream()).await;
    let source = CatalogSource::new(client(), format!("{}/nowhere", base));

    let err = source.fetch("heat", 1, 20).await.unwrap_err();

    assert!(
        matches!(err, SourceError::HttpStatus { status: 404, .. }),
        "got {:?}",
        err
    );
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_omdb_hit_and_miss() {
    let base = spawn_omdb().await;
    let omdb = OmdbClient::new(client(), &base, API_KEY).unwrap();

    let hit = omdb.by_id("tt0113277").await.unwrap().unwrap();
    assert_eq!(hit.title, "Heat");
    assert_eq!(hit.vote_count(), 712_000);
    assert_eq!(hit.media_type, Some(MediaType::Movie));

    let hit = omdb.by_title(&TitleQuery::new("Heat", 1995)).await.unwrap();
    assert_eq!(hit.unwrap().imdb_id.as_deref(), Some("tt0113277"));

    let miss = omdb.by_title(&TitleQuery::new("Nonexistent", 0)).await.unwrap();
    assert!(miss.is_none());

    // Untyped lookups do not see series-only titles.
    assert!(omdb.by_title(&TitleQuery::new("Show", 0)).await.unwrap().is_none());
    let series = omdb
        .by_title(&TitleQuery::new("Show", 0).with_type(MediaType::Series))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(series.vote_count(), 1234);
    assert_eq!(series.total_seasons.as_deref(), Some("4"));
}

#[tokio::test]
async fn test_omdb_rejected_key() {
    let base = spawn_omdb().await;
    let omdb = OmdbClient::new(client(), &base, "wrong-key").unwrap();

    let err = omdb.by_id("tt0113277").await.unwrap_err();

    assert!(matches!(err, MetadataError::NotConfigured(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_omdb_error_status() {
    let base = spawn_omdb().await;
    let omdb = OmdbClient::new(client(), &base, API_KEY).unwrap();

    let err = omdb.by_title(&TitleQuery::new("Outage", 0)).await.unwrap_err();

    match err {
        MetadataError::ApiError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "try later");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_enricher_retries_series_over_http() {
    let base = spawn_omdb().await;
    let omdb: Arc<dyn MetadataLookup> =
        Arc::new(OmdbClient::new(client(), &base, API_KEY).unwrap());
    let enricher = Enricher::new(omdb);

    let episode = Entry {
        title: "Show S01E02".to_string(),
        source: SourceKind::Index,
        ..Default::default()
    };
    let result = enricher.enrich(&episode).await.unwrap();
    assert_eq!(result.vote_count(), 1234);
    assert_eq!(result.media_type, Some(MediaType::Series));

    let unknown = Entry {
        title: "Nothing.Here.2020.1080p".to_string(),
        source: SourceKind::Index,
        ..Default::default()
    };
    assert!(enricher.enrich(&unknown).await.is_none());
}

#[tokio::test]
async fn test_enricher_swallows_lookup_errors() {
    let base = spawn_omdb().await;
    let omdb: Arc<dyn MetadataLookup> =
        Arc::new(OmdbClient::new(client(), &base, "wrong-key").unwrap());
    let enricher = Enricher::new(omdb);

    let entry = Entry {
        title: "Heat".to_string(),
        year: 1995,
        ..Default::default()
    };
    assert!(enricher.enrich(&entry).await.is_none());
}
