// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! POST /analyze: screenshot OCR, description, tags and embedding

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{analyze_handler, run_analysis};
pub use request::AnalyzeRequest;
pub use response::{AnalyzeResponse, TagItem};
