// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! The Azure clients against a local fake resource

use super::fake_azure::*;
use axum::http::StatusCode;
use mnemo_api::{
    config::AppConfig,
    embeddings::{AzureEmbeddingClient, EmbeddingProvider},
    upstream::{build_http_client, ErrorClass, UpstreamError},
    vision::{AzureVisionClient, VisionProvider, VisionRequest},
};
use std::time::Duration;

const PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

fn config_for(endpoint: &str) -> AppConfig {
    let mut config = AppConfig::new_for_test();
    config.endpoint = endpoint.to_string();
    config.upstream_api_key = "upstream-key".to_string();
    config.embedding_dimensions = 4;
    config
}

fn vision_request(hint: Option<&str>) -> VisionRequest {
    VisionRequest {
        image_base64: PNG_BASE64.to_string(),
        mime_type: "image/png".to_string(),
        language_hint: hint.map(str::to_string),
    }
}

fn http() -> reqwest::Client {
    build_http_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_vision_request_shape() {
    let fake = FakeAzure::new().with_chat(
        StatusCode::OK,
        chat_reply(Some(r#"{"ocr_text":"hi","description":"","tags":[]}"#)),
    );
    let endpoint = fake.spawn().await;
    let client = AzureVisionClient::new(http(), &config_for(&endpoint));

    let content = client.analyze(&vision_request(Some("ja"))).await.unwrap();
    assert_eq!(
        content.as_deref(),
        Some(r#"{"ocr_text":"hi","description":"","tags":[]}"#)
    );

    let requests = fake.requests();
    assert_eq!(requests.len(), 1);
    let sent = &requests[0];
    assert_eq!(sent.path, "/openai/deployments/gpt-5-mini/chat/completions");
    assert_eq!(sent.query.as_deref(), Some("api-version=2024-10-21"));
    assert_eq!(sent.api_key.as_deref(), Some("upstream-key"));

    let body = &sent.body;
    assert_eq!(body["max_tokens"], 2000);
    assert!((body["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    assert_eq!(body["response_format"]["type"], "json_object");
    assert_eq!(body["messages"][0]["role"], "system");

    let parts = body["messages"][1]["content"].as_array().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0]["type"], "text");
    assert!(parts[0]["text"].as_str().unwrap().contains("ja"));
    assert_eq!(parts[1]["type"], "image_url");
    assert_eq!(parts[1]["image_url"]["detail"], "high");
    assert_eq!(
        parts[1]["image_url"]["url"],
        format!("data:image/png;base64,{}", PNG_BASE64)
    );
}

#[tokio::test]
async fn test_vision_without_hint_sends_only_image() {
    let fake = FakeAzure::new();
    let endpoint = fake.spawn().await;
    let client = AzureVisionClient::new(http(), &config_for(&endpoint));

    client.analyze(&vision_request(None)).await.unwrap();

    let parts = fake.requests()[0].body["messages"][1]["content"].clone();
    assert_eq!(parts.as_array().unwrap().len(), 1);
    assert_eq!(parts[0]["type"], "image_url");
}

#[tokio::test]
async fn test_vision_no_choices_is_none() {
    let fake = FakeAzure::new().with_chat(StatusCode::OK, serde_json::json!({"choices": []}));
    let endpoint = fake.spawn().await;
    let client = AzureVisionClient::new(http(), &config_for(&endpoint));

    assert_eq!(client.analyze(&vision_request(None)).await.unwrap(), None);
}

#[tokio::test]
async fn test_vision_rate_limit_status() {
    let fake = FakeAzure::new().with_chat(
        StatusCode::TOO_MANY_REQUESTS,
        serde_json::json!({"error": {"code": "RateLimitReached", "message": "Try again later"}}),
    );
    let endpoint = fake.spawn().await;
    let client = AzureVisionClient::new(http(), &config_for(&endpoint));

    let err = client.analyze(&vision_request(None)).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status { status: 429, .. }));
    assert_eq!(err.class(), ErrorClass::RateLimited);
}

#[tokio::test]
async fn test_vision_timeout() {
    let fake = FakeAzure::new().with_delay(Duration::from_secs(2));
    let endpoint = fake.spawn().await;
    let client = AzureVisionClient::new(
        build_http_client(Duration::from_millis(200)).unwrap(),
        &config_for(&endpoint),
    );

    let err = client.analyze(&vision_request(None)).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Timeout(_)), "got {:?}", err);
    assert_eq!(err.class(), ErrorClass::UpstreamTimeout);
}

#[tokio::test]
async fn test_vision_bad_envelope_is_decode_error() {
    let fake = FakeAzure::new().with_chat(StatusCode::OK, serde_json::json!({"choices": "nope"}));
    let endpoint = fake.spawn().await;
    let client = AzureVisionClient::new(http(), &config_for(&endpoint));

    let err = client.analyze(&vision_request(None)).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Decode(_)));
    assert_eq!(err.class(), ErrorClass::Unexpected);
}

#[tokio::test]
async fn test_embedding_request_shape() {
    let fake = FakeAzure::new();
    let endpoint = fake.spawn().await;
    let client = AzureEmbeddingClient::new(http(), &config_for(&endpoint));

    let vector = client.embed("hello world").await.unwrap();
    assert_eq!(vector.len(), 4);
    assert_eq!(client.dimensions(), 4);

    let sent = &fake.requests()[0];
    assert_eq!(
        sent.path,
        "/openai/deployments/text-embedding-3-small/embeddings"
    );
    assert_eq!(sent.query.as_deref(), Some("api-version=2024-10-21"));
    assert_eq!(sent.api_key.as_deref(), Some("upstream-key"));
    assert_eq!(
        sent.body,
        serde_json::json!({
            "model": "text-embedding-3-small",
            "input": ["hello world"],
            "dimensions": 4
        })
    );
}

#[tokio::test]
async fn test_embedding_length_mismatch() {
    let fake = FakeAzure::new().with_embeddings(StatusCode::OK, embedding_reply(3));
    let endpoint = fake.spawn().await;
    let client = AzureEmbeddingClient::new(http(), &config_for(&endpoint));

    let err = client.embed("hello").await.unwrap_err();
    assert_eq!(
        err,
        UpstreamError::InvalidResponse(
            "embedding dimension mismatch: expected 4, got 3".to_string()
        )
    );
}

#[tokio::test]
async fn test_embedding_empty_data() {
    let fake = FakeAzure::new().with_embeddings(StatusCode::OK, serde_json::json!({"data": []}));
    let endpoint = fake.spawn().await;
    let client = AzureEmbeddingClient::new(http(), &config_for(&endpoint));

    let err = client.embed("hello").await.unwrap_err();
    assert!(matches!(err, UpstreamError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_empty_upstream_key_sends_no_header() {
    let fake = FakeAzure::new();
    let endpoint = fake.spawn().await;
    let mut config = config_for(&endpoint);
    config.upstream_api_key = String::new();
    let client = AzureEmbeddingClient::new(http(), &config);

    client.embed("hello").await.unwrap();
    assert!(fake.requests()[0].api_key.is_none());
}

#[tokio::test]
async fn test_service_unavailable_status() {
    let fake = FakeAzure::new().with_embeddings(
        StatusCode::SERVICE_UNAVAILABLE,
        serde_json::json!({"error": "busy"}),
    );
    let endpoint = fake.spawn().await;
    let client = AzureEmbeddingClient::new(http(), &config_for(&endpoint));

    let err = client.embed("hello").await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::UpstreamUnavailable);
}
