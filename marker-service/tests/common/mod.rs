#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use marker_service::config::MarkerConfig;
use marker_service::models::Marker;
use marker_service::services::{InMemoryMarkerStore, MarkerStore, StoreError};
use marker_service::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

pub const MARKERS_URL: &str = "/api/v1/markers/";

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryMarkerStore,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    pub fn error(&self) -> String {
        self.json()["error"]
            .as_str()
            .expect("Missing error message")
            .to_string()
    }
}

impl TestApp {
    pub fn spawn() -> Self {
        let store = InMemoryMarkerStore::new();
        let state = AppState::new(MarkerConfig::in_memory(), Arc::new(store.clone()));

        TestApp {
            router: build_router(state),
            store,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        send(&self.router, request).await
    }

    pub async fn list(&self) -> TestResponse {
        self.send(empty_request(Method::GET, MARKERS_URL)).await
    }

    pub async fn create(&self, body: &Value) -> TestResponse {
        self.send(json_request(Method::POST, MARKERS_URL, body))
            .await
    }

    pub async fn update(&self, id: &str, body: &Value) -> TestResponse {
        self.send(json_request(
            Method::PUT,
            &format!("/api/v1/markers/{}", id),
            body,
        ))
        .await
    }

    pub async fn delete(&self, id: &str) -> TestResponse {
        self.send(empty_request(
            Method::DELETE,
            &format!("/api/v1/markers/{}", id),
        ))
        .await
    }
}

/// Router over an arbitrary store, for failure-mode tests.
pub fn router_with_store(config: MarkerConfig, store: Arc<dyn MarkerStore>) -> Router {
    build_router(AppState::new(config, store))
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    raw_json_request(method, uri, body.to_string())
}

pub fn raw_json_request(method: Method, uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub fn marker_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "location": { "latitude": 48.8584, "longitude": 2.2945 },
        "images": [
            { "id": "front", "uri": "https://cdn.example.com/front.jpg", "width": 1024, "height": 768 },
            { "id": "side", "uri": "https://cdn.example.com/side.jpg", "width": 640, "height": 480 }
        ]
    })
}

/// Store whose every operation fails with a backend error.
pub struct FailingStore;

#[async_trait]
impl MarkerStore for FailingStore {
    async fn list(&self) -> Result<Vec<Marker>, StoreError> {
        Err(anyhow::anyhow!("connection refused").into())
    }

    async fn insert(&self, _marker: &Marker) -> Result<(), StoreError> {
        Err(anyhow::anyhow!("connection refused").into())
    }

    async fn delete(&self, _id: &str) -> Result<bool, StoreError> {
        Err(anyhow::anyhow!("connection refused").into())
    }

    async fn replace(&self, _marker: &Marker) -> Result<bool, StoreError> {
        Err(anyhow::anyhow!("connection refused").into())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(anyhow::anyhow!("connection refused").into())
    }
}

/// Store whose `list` takes `delay` and records whether it ever finished.
pub struct SlowStore {
    pub delay: Duration,
    pub finished: Arc<AtomicBool>,
}

#[async_trait]
impl MarkerStore for SlowStore {
    async fn list(&self) -> Result<Vec<Marker>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(vec![])
    }

    async fn insert(&self, _marker: &Marker) -> Result<(), StoreError> {
        Ok(())
    }

    async fn delete(&self, _id: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn replace(&self, _marker: &Marker) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store that panics on `list`.
pub struct PanickingStore;

#[async_trait]
impl MarkerStore for PanickingStore {
    async fn list(&self) -> Result<Vec<Marker>, StoreError> {
        panic!("store exploded")
    }

    async fn insert(&self, _marker: &Marker) -> Result<(), StoreError> {
        Ok(())
    }

    async fn delete(&self, _id: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn replace(&self, _marker: &Marker) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
