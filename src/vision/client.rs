// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision client for screenshot analysis via an Azure OpenAI chat deployment

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::prompt::{language_hint_text, SYSTEM_PROMPT};
use crate::config::AppConfig;
use crate::upstream::{post_json, UpstreamError};

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(serde::Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(serde::Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.1;

/// One screenshot to analyse
#[derive(Debug, Clone, PartialEq)]
pub struct VisionRequest {
    /// Base64 image data, without a `data:` prefix
    pub image_base64: String,
    /// MIME type used to build the data URL
    pub mime_type: String,
    /// Advisory language hint, forwarded verbatim
    pub language_hint: Option<String>,
}

/// A multimodal model that turns a screenshot into a JSON text payload
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Returns the raw message content, `None` if the model produced none
    async fn analyze(&self, request: &VisionRequest) -> Result<Option<String>, UpstreamError>;
}

/// Client for an Azure OpenAI chat-completions deployment
pub struct AzureVisionClient {
    client: Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    api_key: String,
}

impl AzureVisionClient {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        info!(
            "Vision client configured: endpoint={}, deployment={}",
            endpoint, config.vision_deployment
        );

        Self {
            client,
            endpoint,
            deployment: config.vision_deployment.clone(),
            api_version: config.api_version.clone(),
            api_key: config.upstream_api_key.clone(),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            self.endpoint, self.deployment
        )
    }

    fn build_request(&self, request: &VisionRequest) -> ChatRequest {
        ChatRequest {
            model: self.deployment.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: serde_json::Value::String(SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content(request),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
        }
    }
}

/// Optional language hint first, then the image
fn user_content(request: &VisionRequest) -> serde_json::Value {
    let mut parts = Vec::with_capacity(2);

    if let Some(hint) = request.language_hint.as_deref().filter(|h| !h.is_empty()) {
        parts.push(serde_json::json!({"type": "text", "text": language_hint_text(hint)}));
    }

    let data_url = format!("data:{};base64,{}", request.mime_type, request.image_base64);
    parts.push(serde_json::json!({
        "type": "image_url",
        "image_url": {"url": data_url, "detail": "high"}
    }));

    serde_json::Value::Array(parts)
}

#[async_trait]
impl VisionProvider for AzureVisionClient {
    async fn analyze(&self, request: &VisionRequest) -> Result<Option<String>, UpstreamError> {
        let start = std::time::Instant::now();
        let body = self.build_request(request);

        let response: ChatResponse = post_json(
            &self.client,
            &self.completions_url(),
            &self.api_version,
            &self.api_key,
            &body,
        )
        .await?;

        let tokens_used = response.usage.map(|u| u.total_tokens).unwrap_or(0);
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);

        debug!(
            "Vision completion: {} chars, {} tokens, {}ms",
            content.as_ref().map(|c| c.len()).unwrap_or(0),
            tokens_used,
            start.elapsed().as_millis()
        );

        Ok(content)
    }
}
