// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze endpoint handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{debug, error, info, warn};

use super::request::AnalyzeRequest;
use super::response::AnalyzeResponse;
use crate::api::auth::DeviceId;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::embeddings::{build_embedding_input, EmbeddingProvider};
use crate::upstream::UpstreamError;
use crate::vision::{parse_analysis, VisionProvider};

const ANALYZE_OPERATION: &str = "image analysis";

/// Longest slice of a rejected vision payload written to debug logs
const PAYLOAD_LOG_PREFIX: usize = 200;

/// POST /analyze - OCR, description, tags and embedding for one screenshot
///
/// Requires `X-API-Key` and `X-Device-ID` when an API key is configured.
pub async fn analyze_handler(
    State(state): State<AppState>,
    DeviceId(device_id): DeviceId,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload?;

    info!(
        device_id = %device_id,
        image_id = %request.image_id,
        "Analyze request received"
    );

    let response =
        run_analysis(state.vision.as_ref(), state.embeddings.as_ref(), request).await?;
    Ok(Json(response))
}

/// Validate, call the vision model, normalize, then embed the combined text.
///
/// The embedding call is skipped when the analysis produced no text.
pub async fn run_analysis(
    vision: &dyn VisionProvider,
    embeddings: &dyn EmbeddingProvider,
    request: AnalyzeRequest,
) -> Result<AnalyzeResponse, ApiError> {
    let info = request.validate()?;
    let (image_id, vision_request) = request.into_vision_request(&info);
    debug!(
        image_id = %image_id,
        image_bytes = info.size_bytes,
        mime_type = %vision_request.mime_type,
        "Image accepted"
    );

    let raw = vision
        .analyze(&vision_request)
        .await
        .map_err(|e| upstream_failure(&e, &image_id))?;

    let analysis = parse_analysis(raw.as_deref()).map_err(|e| {
        warn!(image_id = %image_id, "Vision payload rejected: {}", e);
        debug!(
            image_id = %image_id,
            "Rejected payload prefix: {:?}",
            payload_prefix(raw.as_deref())
        );
        ApiError::from(e)
    })?;

    let embedding = match build_embedding_input(&analysis) {
        Some(text) => embeddings
            .embed(&text)
            .await
            .map_err(|e| upstream_failure(&e, &image_id))?,
        None => {
            warn!(image_id = %image_id, "Analysis produced no text, skipping embedding");
            Vec::new()
        }
    };

    info!(
        image_id = %image_id,
        image_bytes = info.size_bytes,
        ocr_chars = analysis.ocr_text.chars().count(),
        tags = analysis.tags.len(),
        embedding_dims = embedding.len(),
        "Analysis complete"
    );

    Ok(AnalyzeResponse::new(image_id, analysis, embedding))
}

fn upstream_failure(err: &UpstreamError, image_id: &str) -> ApiError {
    let api_error = ApiError::from_upstream(err, ANALYZE_OPERATION);
    error!(
        image_id = %image_id,
        operation = ANALYZE_OPERATION,
        error_type = api_error.error_type(),
        "Upstream call failed: {}",
        err
    );
    api_error
}

fn payload_prefix(raw: Option<&str>) -> String {
    raw.unwrap_or_default()
        .chars()
        .take(PAYLOAD_LOG_PREFIX)
        .collect()
}
