// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error type for provider calls

use thiserror::Error;

use super::classifier::{classify_message, ErrorClass};

/// Longest upstream body excerpt kept inside an error message
const MAX_BODY_EXCERPT: usize = 500;

/// Failure of a single call to the vision or embedding endpoint
///
/// The `Display` text of every variant except `InvalidResponse` is what the
/// classifier inspects, so transport variants keep the words it looks for
/// ("timeout", "connection", the numeric HTTP status).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UpstreamError {
    /// The request did not complete within the client timeout
    #[error("upstream request timeout: {0}")]
    Timeout(String),

    /// The provider could not be reached
    #[error("upstream connection failed: {0}")]
    Connection(String),

    /// The provider answered with a non-success status
    #[error("upstream returned HTTP {status} {reason}: {body}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    /// The response envelope could not be decoded
    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    /// The envelope decoded but its content is unusable (no data, wrong length)
    #[error("{0}")]
    InvalidResponse(String),

    /// Anything else raised while building or sending the request
    #[error("upstream request failed: {0}")]
    Request(String),
}

impl UpstreamError {
    /// Build a `Status` error from a response status and its body text
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        UpstreamError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body: truncate(body, MAX_BODY_EXCERPT),
        }
    }

    /// Classify this error by its message text
    pub fn class(&self) -> ErrorClass {
        classify_message(&self.to_string())
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(err.to_string())
        } else if err.is_connect() {
            UpstreamError::Connection(err.to_string())
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Request(err.to_string())
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
