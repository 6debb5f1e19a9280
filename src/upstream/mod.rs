// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared plumbing for calls to the hosted AI provider
//!
//! This module provides:
//! - `UpstreamError`, the failure type of every provider call
//! - The message-based error classifier used at the handler boundary
//! - A JSON POST helper shared by the vision and embedding clients

pub mod classifier;
pub mod error;
pub mod http;

pub use classifier::{classify_message, ErrorClass};
pub use error::UpstreamError;
pub use http::{build_http_client, post_json};
