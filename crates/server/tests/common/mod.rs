#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Every [`TestApp`] drives the REAL router and state over its own store, so
//! tests never share records.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use estate_server::config::Environment;
use estate_server::listing::{ListingFilter, ListingSort};
use estate_server::models::{Listing, NewListing};
use estate_server::store::{ListingStore, MemoryListingStore, StoreError};
use estate_server::{AppState, Config, build_router};

/// Project-root `templates/` directory.
pub fn templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

/// Development-mode config backed by the in-memory store.
pub fn test_config(environment: Environment) -> Config {
    Config {
        environment,
        templates_dir: templates_dir(),
        ..Config::default()
    }
}

/// Test application wrapper using the real routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub store: Arc<dyn ListingStore>,
}

impl TestApp {
    /// App over a fresh in-memory store, development mode.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryListingStore::new()), Environment::Development)
    }

    pub fn with_store(store: Arc<dyn ListingStore>, environment: Environment) -> Self {
        Self::with_config(test_config(environment), store)
    }

    /// App with an explicit config over `store`.
    pub fn with_config(config: Config, store: Arc<dyn ListingStore>) -> Self {
        let state =
            AppState::with_store(config, store.clone()).expect("Failed to initialize AppState");
        let router = build_router(state.clone());
        Self {
            router,
            state,
            store,
        }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// GET a JSON endpoint.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .request(Request::get(uri).body(Body::empty()).unwrap())
            .await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// POST a JSON body.
    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(uri, "application/json", body.to_string()).await
    }

    /// POST an arbitrary body with the given content type.
    pub async fn post_raw(
        &self,
        uri: &str,
        content_type: &str,
        body: impl Into<Body>,
    ) -> (StatusCode, Value) {
        let response = self
            .request(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, content_type)
                    .body(body.into())
                    .unwrap(),
            )
            .await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// GET an HTML page.
    pub async fn get_html(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .request(Request::get(uri).body(Body::empty()).unwrap())
            .await;
        let status = response.status();
        (status, body_string(response).await)
    }

    /// Create a listing through the API and return its JSON.
    pub async fn create(&self, payload: &Value) -> Value {
        let (status, body) = self.post_json("/api/v1/apartments", payload).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body["data"].clone()
    }

    pub async fn stored_count(&self) -> u64 {
        self.store.count(&ListingFilter::default()).await.unwrap()
    }
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let text = body_string(response).await;
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("invalid JSON ({e}): {text}"))
}

/// How a [`FailingStore`] misbehaves.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    /// Every write violates a unique index.
    Duplicate,
    /// Every call fails with a database error.
    Broken,
}

/// Store stub returning fixed errors.
pub struct FailingStore {
    pub failure: Failure,
}

impl FailingStore {
    fn error(&self) -> StoreError {
        match self.failure {
            Failure::Duplicate => StoreError::Duplicate("listing_title_key".to_string()),
            Failure::Broken => StoreError::Database(sqlx::Error::PoolClosed),
        }
    }
}

#[async_trait]
impl ListingStore for FailingStore {
    async fn create(&self, _listing: NewListing) -> Result<Listing, StoreError> {
        Err(self.error())
    }

    async fn find(
        &self,
        _filter: &ListingFilter,
        _sort: &ListingSort,
        _skip: u64,
        _limit: u64,
    ) -> Result<Vec<Listing>, StoreError> {
        Err(self.error())
    }

    async fn count(&self, _filter: &ListingFilter) -> Result<u64, StoreError> {
        Err(self.error())
    }

    async fn get_by_id(&self, _id: Uuid) -> Result<Option<Listing>, StoreError> {
        Err(self.error())
    }

    async fn healthy(&self) -> bool {
        false
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}
