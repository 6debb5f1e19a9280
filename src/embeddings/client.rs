// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedding client for an Azure OpenAI embedding deployment

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::upstream::{post_json, UpstreamError};

#[derive(Debug, Serialize)]
struct EmbeddingApiRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingApiResponse {
    #[serde(default)]
    data: Vec<EmbeddingApiData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingApiData {
    embedding: Vec<f32>,
}

/// A text-embedding model producing fixed-length vectors
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one non-empty text. The result has exactly `dimensions()` entries.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, UpstreamError>;

    /// Configured vector length
    fn dimensions(&self) -> usize;
}

/// Client for an Azure OpenAI embeddings deployment
pub struct AzureEmbeddingClient {
    client: Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    api_key: String,
    dimensions: usize,
}

impl AzureEmbeddingClient {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        info!(
            "Embedding client configured: endpoint={}, deployment={}, dimensions={}",
            endpoint, config.embedding_deployment, config.embedding_dimensions
        );

        Self {
            client,
            endpoint,
            deployment: config.embedding_deployment.clone(),
            api_version: config.api_version.clone(),
            api_key: config.upstream_api_key.clone(),
            dimensions: config.embedding_dimensions,
        }
    }

    fn embeddings_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/embeddings",
            self.endpoint, self.deployment
        )
    }
}

#[async_trait]
impl EmbeddingProvider for AzureEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, UpstreamError> {
        let body = EmbeddingApiRequest {
            model: &self.deployment,
            input: [text],
            dimensions: self.dimensions,
        };

        let response: EmbeddingApiResponse = post_json(
            &self.client,
            &self.embeddings_url(),
            &self.api_version,
            &self.api_key,
            &body,
        )
        .await?;

        let embedding = first_embedding(response)?;
        let embedding = check_dimensions(embedding, self.dimensions)?;

        debug!(
            "Embedding generated: {} dimensions for text length {}",
            embedding.len(),
            text.len()
        );
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn first_embedding(response: EmbeddingApiResponse) -> Result<Vec<f32>, UpstreamError> {
    response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| {
            UpstreamError::InvalidResponse("embedding response contained no data".into())
        })
}

/// Reject vectors whose length differs from the configured dimensionality
pub fn check_dimensions(embedding: Vec<f32>, expected: usize) -> Result<Vec<f32>, UpstreamError> {
    if embedding.len() != expected {
        return Err(UpstreamError::InvalidResponse(format!(
            "embedding dimension mismatch: expected {}, got {}",
            expected,
            embedding.len()
        )));
    }
    Ok(embedding)
}
