// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response types for the embedding endpoints

use serde::{Deserialize, Serialize};

/// Response from POST /embed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,
}

/// Response from POST /search/embed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEmbedResponse {
    pub embedding: Vec<f32>,
}
