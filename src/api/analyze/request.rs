// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze request types and validation

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::vision::{inspect_base64_image, ImageInfo, VisionRequest};

/// Request body for POST /analyze
///
/// # Example
/// ```json
/// {
///   "image": "iVBORw0KGgo...",
///   "image_id": "6f1c2d7e-0b7a-4c53-9a55-2f0f3f1d9b11",
///   "language_hint": "ja"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64-encoded image data
    pub image: String,

    /// Client-side identifier of the screenshot, echoed back
    pub image_id: String,

    /// Language hint (e.g. "ja", "en"), advisory only
    #[serde(default)]
    pub language_hint: Option<String>,
}

impl AnalyzeRequest {
    /// Validate the request and inspect the image payload
    ///
    /// `image` must be non-empty standard base64 of at most 20MB decoded.
    /// `image_id` is opaque to the service and echoed back unchecked.
    pub fn validate(&self) -> Result<ImageInfo, ApiError> {
        if self.image.is_empty() {
            return Err(ApiError::validation("image", "image is required"));
        }

        Ok(inspect_base64_image(&self.image)?)
    }

    /// Consume the request into the upstream vision call
    pub fn into_vision_request(self, info: &ImageInfo) -> (String, VisionRequest) {
        let vision = VisionRequest {
            image_base64: self.image,
            mime_type: info.mime_type().to_string(),
            language_hint: self.language_hint,
        };
        (self.image_id, vision)
    }
}
