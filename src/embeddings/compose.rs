// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Builds the text embedded for an analysed screenshot

use crate::vision::AnalysisResult;

/// Join OCR text, description and tag labels (in that order) with single
/// spaces, skipping empty parts.
///
/// Returns `None` when the joined text is blank; callers then skip the
/// embedding call entirely and report an empty vector.
pub fn build_embedding_input(result: &AnalysisResult) -> Option<String> {
    let parts = [result.ocr_text.as_str(), result.description.as_str()]
        .into_iter()
        .chain(result.tags.iter().map(|t| t.label.as_str()))
        .filter(|part| !part.is_empty());

    let joined = parts.collect::<Vec<_>>().join(" ");

    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
    }
}
