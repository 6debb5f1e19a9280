// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request types for the embedding endpoints

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

/// Request body for POST /embed
///
/// ```json
/// { "text": "Meeting notes from Tuesday" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    pub text: String,
}

impl EmbedRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("text", &self.text)
    }
}

/// Request body for POST /search/embed
///
/// ```json
/// { "query": "receipt from the cafe" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEmbedRequest {
    pub query: String,
}

impl SearchEmbedRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("query", &self.query)
    }
}

/// Empty input is rejected; whitespace is passed through to the model as is
fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::validation(field, format!("{} cannot be empty", field)));
    }
    Ok(())
}
