// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Message-based classification of provider failures
//!
//! Failures are bucketed by case-insensitive substring match on their message.
//! Handlers only ever see the resulting `ErrorClass`.

/// Retry hint sent with rate-limited responses, in seconds
pub const RETRY_AFTER_SECS: u64 = 60;

/// Caller-facing category of a provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    RateLimited,
    UpstreamTimeout,
    UpstreamUnavailable,
    Unexpected,
}

impl ErrorClass {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorClass::RateLimited => 429,
            ErrorClass::UpstreamTimeout | ErrorClass::UpstreamUnavailable => 503,
            ErrorClass::Unexpected => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::RateLimited => "rate_limited",
            ErrorClass::UpstreamTimeout => "upstream_timeout",
            ErrorClass::UpstreamUnavailable => "upstream_unavailable",
            ErrorClass::Unexpected => "unexpected",
        }
    }
}

/// Classify an error message. First matching rule wins:
///
/// 1. "rate limit" or "429" -> `RateLimited`
/// 2. "timeout" -> `UpstreamTimeout`
/// 3. "connection" or "unavailable" -> `UpstreamUnavailable`
/// 4. anything else -> `Unexpected`
pub fn classify_message(message: &str) -> ErrorClass {
    let lower = message.to_lowercase();

    if lower.contains("rate limit") || lower.contains("429") {
        ErrorClass::RateLimited
    } else if lower.contains("timeout") {
        ErrorClass::UpstreamTimeout
    } else if lower.contains("connection") || lower.contains("unavailable") {
        ErrorClass::UpstreamUnavailable
    } else {
        ErrorClass::Unexpected
    }
}
