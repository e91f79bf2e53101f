//! Common test utilities for in-process API testing.
//!
//! Provides a fixture that assembles the real router over a temp-file SQLite
//! store, with the mover configured for instant (unthrottled) moves.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use corral_core::{
    BulkMover, CollectionStore, Config, MoverConfig, SqliteCollectionStore,
};
use corral_server::api::create_router;
use corral_server::state::AppState;

/// Test fixture with an in-process server and direct store access.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// The store behind the router, for seeding and assertions
    pub store: Arc<SqliteCollectionStore>,
    _temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new fixture with an empty store.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let store = Arc::new(
            SqliteCollectionStore::new(&db_path, "Liked Companies List")
                .expect("Failed to create store"),
        );

        let mover = BulkMover::new(
            Arc::clone(&store) as Arc<dyn CollectionStore>,
            MoverConfig {
                batch_size: 2,
                insert_throttle_ms: 0,
            },
        );

        let state = Arc::new(AppState::new(
            Config::default(),
            Arc::clone(&store) as Arc<dyn CollectionStore>,
            mover,
        ));

        Self {
            router: create_router(state),
            store,
            _temp_dir: temp_dir,
        }
    }

    /// Create a collection and return its id.
    pub fn create_collection(&self, name: &str) -> Uuid {
        self.store.create_collection(name).expect("create collection").id
    }

    /// Create `count` companies and add them to a collection.
    pub fn populate(&self, collection_id: Uuid, count: usize) -> Vec<Uuid> {
        let names: Vec<String> = (0..count).map(|i| format!("Company {i}")).collect();
        let ids = self.store.create_companies(&names).expect("create companies");
        self.store
            .insert_members(collection_id, &ids)
            .expect("insert members");
        ids
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        let request = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                builder
                    .body(Body::from(serde_json::to_vec(&json).unwrap()))
                    .unwrap()
            }
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).to_string(),
            ))
        };

        TestResponse { status, body }
    }

    /// Poll the progress endpoint until the job settles.
    pub async fn wait_for_job(&self, job_id: &str) -> Value {
        for _ in 0..200 {
            let response = self.get(&format!("/collections/progress/{job_id}")).await;
            assert_eq!(response.status, StatusCode::OK);
            let status = response.body["status"].as_str().unwrap().to_string();
            if status == "completed" || status == "error" {
                return response.body;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("job {job_id} never settled");
    }
}
