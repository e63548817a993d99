//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock feed and notifier injected over a temporary SQLite store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use herald_core::{
    config::{
        DatabaseConfig, DiscordConfig, FeedConfig, RankingConfig, ServerConfig,
        SubscriptionConfig,
    },
    testing::{MockFeedFetcher, MockNotifier},
    Clock, Config, FeedFetcher, FeedWatcher, FixedClock, KeyValueStore, Notifier, RankingService,
    SqliteKvStore, SubscriptionService, WatcherConfig,
};

/// Re-export fixtures for test convenience
pub use herald_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// Provides an in-process server with controllable mocks for:
/// - The RSS feed (MockFeedFetcher)
/// - Discord delivery (MockNotifier)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_subscribe() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/subscriptions/42", json!({
///         "keyword": "anime"
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock feed - configure snapshots and failures
    pub fetcher: Arc<MockFeedFetcher>,
    /// Mock notifier - inspect deliveries
    pub notifier: Arc<MockNotifier>,
    /// Store shared with the watcher and subscription service
    pub store: Arc<SqliteKvStore>,
    /// The watcher behind `/status` and `/check`
    pub watcher: Arc<FeedWatcher>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_max_keywords(10).await
    }

    /// Create a test fixture with a custom keyword limit.
    pub async fn with_max_keywords(max_keywords: usize) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let fetcher = Arc::new(MockFeedFetcher::new());
        let notifier = Arc::new(MockNotifier::new());
        let store = Arc::new(SqliteKvStore::new(&db_path).expect("Failed to create store"));

        let config = Config {
            discord: DiscordConfig {
                bot_token: "test-token".to_string(),
                channel_id: "1000".to_string(),
                api_base_url: "http://127.0.0.1:9".to_string(),
                timeout_secs: 1,
            },
            feed: FeedConfig::default(),
            watcher: WatcherConfig {
                enabled: false,
                pacing_ms: 0,
                ..Default::default()
            },
            subscriptions: SubscriptionConfig { max_keywords },
            ranking: RankingConfig::default(),
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
        };

        let watcher = Arc::new(FeedWatcher::new(
            config.watcher.clone(),
            Arc::clone(&fetcher) as Arc<dyn FeedFetcher>,
            Arc::clone(&store) as Arc<dyn KeyValueStore>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        ));
        let subscriptions = SubscriptionService::new(
            Arc::clone(&store) as Arc<dyn KeyValueStore>,
            max_keywords,
        );
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixtures::reference_now()));
        let rankings = RankingService::new(
            Arc::clone(&fetcher) as Arc<dyn FeedFetcher>,
            clock,
            config.ranking.limit,
        );

        let state = Arc::new(herald_server::state::AppState::new(
            config,
            Arc::clone(&watcher),
            subscriptions,
            rankings,
        ));

        let router = herald_server::api::create_router(state);

        Self {
            router,
            fetcher,
            notifier,
            store,
            watcher,
            temp_dir,
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

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a GET request and return the raw text body.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
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
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).into_owned())
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

        TestResponse { status, body }
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
