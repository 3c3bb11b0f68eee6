//! Common test utilities for in-process API testing with mocks.
//!
//! This module provides a test fixture that builds the router over mock
//! sources and a mock metadata lookup, so the API can be exercised without
//! any network access.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use marquee_core::{
    build_client,
    testing::{MockMetadata, MockSource},
    Aggregator, Config, Enricher, SearchSettings, SourceKind, TorrentFetcher,
};
use marquee_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use marquee_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// Provides an in-process router with fully controllable mocks for:
/// - The catalog source (MockSource)
/// - The index source (MockSource)
/// - Metadata enrichment (MockMetadata), when enabled
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new().await;
///     fixture.catalog.set_entries(vec![fixtures::catalog_entry("1", "Heat", 1995)]).await;
///
///     let response = fixture.get("/api/v1/search?q=heat").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog source
    pub catalog: Arc<MockSource>,
    /// Mock index source
    pub index: Arc<MockSource>,
    /// Mock metadata lookup - only consulted when enrichment is enabled
    pub metadata: Arc<MockMetadata>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with enrichment enabled.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let catalog = Arc::new(MockSource::new(SourceKind::Catalog));
        let index = Arc::new(MockSource::new(SourceKind::Index));
        let metadata = Arc::new(MockMetadata::new());

        let enricher =
            (!test_config.disable_enrichment).then(|| Enricher::new(metadata.clone()));

        let settings = SearchSettings {
            max_page_size: test_config.max_page_size.unwrap_or(100),
            ..SearchSettings::default()
        };

        let aggregator = Aggregator::new(
            catalog.clone(),
            index.clone(),
            enricher,
            settings,
        );

        let client = build_client(Duration::from_secs(5)).expect("Failed to build client");
        let state = Arc::new(AppState::new(
            Config::default(),
            Arc::new(aggregator),
            TorrentFetcher::for_catalog(
                client,
                test_config
                    .catalog_url
                    .as_deref()
                    .unwrap_or("http://127.0.0.1/api/v2"),
            ),
        ));

        Self {
            router: create_router(state),
            catalog,
            index,
            metadata,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a GET request and return the raw body bytes.
    pub async fn get_bytes(&self, path: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, headers, bytes.to_vec())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            content_type,
            body,
        }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Run without a metadata lookup
    pub disable_enrichment: bool,
    /// Override the maximum page size
    pub max_page_size: Option<u32>,
    /// Catalog base URL; torrent downloads are limited to its host
    pub catalog_url: Option<String>,
}

impl TestConfig {
    /// Create config with enrichment disabled.
    pub fn without_enrichment() -> Self {
        Self {
            disable_enrichment: true,
            ..Default::default()
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
