// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Text embedding endpoints
//!
//! POST /embed embeds arbitrary text, POST /search/embed embeds a search
//! query. Both return a vector of the configured dimensionality.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{embed_handler, embed_text, search_embed_handler};
pub use request::{EmbedRequest, SearchEmbedRequest};
pub use response::{EmbedResponse, SearchEmbedResponse};
