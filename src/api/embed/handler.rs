// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Handlers for POST /embed and POST /search/embed
//!
//! Neither endpoint runs the credential gate; only /analyze is gated.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{error, info};

use super::request::{EmbedRequest, SearchEmbedRequest};
use super::response::{EmbedResponse, SearchEmbedResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::embeddings::EmbeddingProvider;

/// POST /embed - embedding for arbitrary text
pub async fn embed_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    info!("Generating embedding for text ({} chars)", request.text.chars().count());
    let embedding =
        embed_text(state.embeddings.as_ref(), &request.text, "embedding generation").await?;

    Ok(Json(EmbedResponse { embedding }))
}

/// POST /search/embed - embedding for a search query
pub async fn search_embed_handler(
    State(state): State<AppState>,
    payload: Result<Json<SearchEmbedRequest>, JsonRejection>,
) -> Result<Json<SearchEmbedResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    info!(
        "Generating search embedding for query ({} chars)",
        request.query.chars().count()
    );
    let embedding = embed_text(
        state.embeddings.as_ref(),
        &request.query,
        "search embedding generation",
    )
    .await?;

    Ok(Json(SearchEmbedResponse { embedding }))
}

/// Embed `text`, mapping provider failures for the named operation
pub async fn embed_text(
    embeddings: &dyn EmbeddingProvider,
    text: &str,
    operation: &'static str,
) -> Result<Vec<f32>, ApiError> {
    embeddings.embed(text).await.map_err(|e| {
        let api_error = ApiError::from_upstream(&e, operation);
        error!(
            error_type = api_error.error_type(),
            "{} failed: {}", operation, e
        );
        api_error
    })
}
