// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared fixtures for the API tests: stub providers and a request driver

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
};
use mnemo_api::{
    api::http_server::{create_app, AppState},
    config::AppConfig,
    embeddings::EmbeddingProvider,
    upstream::UpstreamError,
    vision::{VisionProvider, VisionRequest},
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

pub const TEST_API_KEY: &str = "integration-secret";
pub const TEST_DEVICE: &str = "device-abc";
pub const TINY_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

pub const FULL_ANALYSIS: &str = r#"{
    "ocr_text": "Flight NH 106 departs 10:40",
    "description": "Boarding pass in an airline app",
    "tags": [
        {"label": "travel", "confidence": 0.92},
        {"label": "boarding pass", "confidence": "1.4"},
        {"label": "airline"}
    ]
}"#;

pub struct StubVision {
    response: Result<Option<String>, UpstreamError>,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<VisionRequest>>,
}

impl StubVision {
    pub fn returning(raw: &str) -> Arc<Self> {
        Self::with(Ok(Some(raw.to_string())))
    }

    pub fn failing(err: UpstreamError) -> Arc<Self> {
        Self::with(Err(err))
    }

    pub fn with(response: Result<Option<String>, UpstreamError>) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionProvider for StubVision {
    async fn analyze(&self, request: &VisionRequest) -> Result<Option<String>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.response.clone()
    }
}

pub struct StubEmbeddings {
    dimensions: usize,
    failure: Option<UpstreamError>,
    pub calls: AtomicUsize,
    pub last_text: Mutex<Option<String>>,
}

impl StubEmbeddings {
    pub fn new(dimensions: usize) -> Arc<Self> {
        Arc::new(Self {
            dimensions,
            failure: None,
            calls: AtomicUsize::new(0),
            last_text: Mutex::new(None),
        })
    }

    pub fn failing(err: UpstreamError) -> Arc<Self> {
        Arc::new(Self {
            dimensions: 512,
            failure: Some(err),
            calls: AtomicUsize::new(0),
            last_text: Mutex::new(None),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text.lock().unwrap() = Some(text.to_string());
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok((0..self.dimensions).map(|i| i as f32 / 1000.0).collect()),
        }
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Config with the credential gate switched on
pub fn gated_config() -> AppConfig {
    let mut config = AppConfig::new_for_test();
    config.api_key = TEST_API_KEY.to_string();
    config
}

pub fn state(
    config: AppConfig,
    vision: Arc<StubVision>,
    embeddings: Arc<StubEmbeddings>,
) -> AppState {
    AppState::new(config, vision, embeddings)
}

pub fn analyze_body(image_id: &str) -> String {
    serde_json::json!({
        "image": TINY_PNG_BASE64,
        "image_id": image_id,
        "language_hint": "ja"
    })
    .to_string()
}

/// POST /analyze with both credential headers set
pub fn authed_analyze(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .header("x-api-key", TEST_API_KEY)
        .header("x-device-id", TEST_DEVICE)
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Drive one request through the router
pub async fn send(state: AppState, request: Request<Body>) -> Response {
    create_app(state).oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn assert_error(response: Response, status: StatusCode, error_type: &str) -> Value {
    assert_eq!(response.status(), status);
    let body = body_json(response).await;
    assert_eq!(body["error_type"], error_type, "body: {}", body);
    assert!(body["detail"].is_string());
    body
}
