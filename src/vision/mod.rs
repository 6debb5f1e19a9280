// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Screenshot analysis through a hosted multimodal model
//!
//! This module provides:
//! - The chat-completions client that sends the screenshot upstream
//! - Normalization of the model's JSON payload into an `AnalysisResult`
//! - Base64 inspection and MIME sniffing for uploaded images

pub mod client;
pub mod image_utils;
pub mod normalizer;
pub mod prompt;

pub use client::{AzureVisionClient, VisionProvider, VisionRequest};
pub use image_utils::{inspect_base64_image, ImageError, ImageInfo};
pub use normalizer::{parse_analysis, AnalysisResult, NormalizeError, Tag};
