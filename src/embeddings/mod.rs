// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text embeddings from a hosted embedding deployment

pub mod client;
pub mod compose;

pub use client::{check_dimensions, AzureEmbeddingClient, EmbeddingProvider};
pub use compose::build_embedding_input;
