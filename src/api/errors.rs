// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::api::auth::AuthError;
use crate::upstream::classifier::RETRY_AFTER_SECS;
use crate::upstream::{ErrorClass, UpstreamError};
use crate::vision::{ImageError, NormalizeError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    Unauthorized(AuthError),
    ValidationError {
        field: String,
        message: String,
    },
    InvalidUpstreamResponse(String),
    PayloadTooLarge,
    RateLimited {
        retry_after: u64,
    },
    UpstreamTimeout,
    UpstreamUnavailable,
    Unexpected {
        operation: &'static str,
    },
}

impl ApiError {
    /// Map a provider failure for the named operation.
    ///
    /// Content failures become `InvalidUpstreamResponse`; everything else goes
    /// through the message classifier.
    pub fn from_upstream(err: &UpstreamError, operation: &'static str) -> Self {
        if let UpstreamError::InvalidResponse(msg) = err {
            return ApiError::InvalidUpstreamResponse(msg.clone());
        }

        let class = err.class();
        debug!(class = class.as_str(), operation, "Classified upstream failure");

        match class {
            ErrorClass::RateLimited => ApiError::RateLimited {
                retry_after: RETRY_AFTER_SECS,
            },
            ErrorClass::UpstreamTimeout => ApiError::UpstreamTimeout,
            ErrorClass::UpstreamUnavailable => ApiError::UpstreamUnavailable,
            ErrorClass::Unexpected => ApiError::Unexpected { operation },
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ApiError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::ValidationError { .. } => "validation_error",
            ApiError::InvalidUpstreamResponse(_) => "invalid_upstream_response",
            ApiError::PayloadTooLarge => "payload_too_large",
            ApiError::RateLimited { .. } => "rate_limited",
            ApiError::UpstreamTimeout => "upstream_timeout",
            ApiError::UpstreamUnavailable => "upstream_unavailable",
            ApiError::Unexpected { .. } => "internal_error",
        }
    }

    /// Caller-facing message. Never contains raw upstream text.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Unauthorized(err) => format!("Authentication error: {}", err),
            ApiError::ValidationError { field, message } => format!("{}: {}", field, message),
            ApiError::InvalidUpstreamResponse(msg) => {
                format!("The AI service returned an invalid response: {}", msg)
            }
            ApiError::PayloadTooLarge => {
                "Request body is too large. Images may be at most 20MB.".to_string()
            }
            ApiError::RateLimited { .. } => {
                "Rate limit reached. Please wait a moment and try again.".to_string()
            }
            ApiError::UpstreamTimeout => {
                "The AI service timed out. Please wait a moment and try again.".to_string()
            }
            ApiError::UpstreamUnavailable => {
                "Cannot reach the AI service. Please wait a moment and try again.".to_string()
            }
            ApiError::Unexpected { operation } => format!(
                "An unexpected error occurred during {}. Please try again later.",
                operation
            ),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error_type: self.error_type().to_string(),
            detail: self.detail(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized(_) => 401,
            ApiError::ValidationError { .. } | ApiError::InvalidUpstreamResponse(_) => 400,
            ApiError::PayloadTooLarge => 413,
            ApiError::RateLimited { .. } => 429,
            ApiError::UpstreamTimeout | ApiError::UpstreamUnavailable => 503,
            ApiError::Unexpected { .. } => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(err) => write!(f, "Unauthorized: {}", err),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::InvalidUpstreamResponse(msg) => {
                write!(f, "Invalid upstream response: {}", msg)
            }
            ApiError::PayloadTooLarge => write!(f, "Request body too large"),
            ApiError::RateLimited { retry_after } => write!(
                f,
                "Rate limit exceeded, retry after {} seconds",
                retry_after
            ),
            ApiError::UpstreamTimeout => write!(f, "Upstream timed out"),
            ApiError::UpstreamUnavailable => write!(f, "Upstream unavailable"),
            ApiError::Unexpected { operation } => {
                write!(f, "Unexpected error during {}", operation)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err)
    }
}

impl From<NormalizeError> for ApiError {
    fn from(err: NormalizeError) -> Self {
        ApiError::InvalidUpstreamResponse(err.to_string())
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        ApiError::validation("image", err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge;
        }
        ApiError::validation("body", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.to_response())).into_response();

        if let ApiError::RateLimited { retry_after } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}
