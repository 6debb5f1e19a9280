// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze response types

use serde::{Deserialize, Serialize};

use crate::vision::{AnalysisResult, Tag};

/// A tag with its confidence (0.0-1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagItem {
    pub label: String,
    pub confidence: f64,
}

impl From<Tag> for TagItem {
    fn from(tag: Tag) -> Self {
        Self {
            label: tag.label,
            confidence: tag.confidence,
        }
    }
}

/// Response from POST /analyze
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Identifier echoed from the request
    pub image_id: String,
    /// Text extracted from the screenshot
    pub ocr_text: String,
    /// Short description of the screenshot
    pub description: String,
    /// Tags in the order the model returned them
    pub tags: Vec<TagItem>,
    /// Embedding of the combined text; empty when there was nothing to embed
    pub embedding: Vec<f32>,
}

impl AnalyzeResponse {
    pub fn new(image_id: String, analysis: AnalysisResult, embedding: Vec<f32>) -> Self {
        Self {
            image_id,
            ocr_text: analysis.ocr_text,
            description: analysis.description,
            tags: analysis.tags.into_iter().map(TagItem::from).collect(),
            embedding,
        }
    }
}
