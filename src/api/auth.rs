// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Credential gate for protected endpoints
//!
//! Clients present a shared secret in `X-API-Key` and an opaque device
//! identifier in `X-Device-ID`. An empty configured secret disables the gate
//! (local development); the device id is then passed through when present.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::warn;

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Device id reported when authentication is disabled and none was sent
pub const UNKNOWN_DEVICE: &str = "unknown";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("API key required")]
    MissingApiKey,

    #[error("API key invalid")]
    InvalidApiKey,

    #[error("device id required")]
    MissingDeviceId,
}

impl AuthError {
    /// Short tag used in logs
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingApiKey => "missing_api_key",
            AuthError::InvalidApiKey => "invalid_api_key",
            AuthError::MissingDeviceId => "missing_device_id",
        }
    }
}

/// Check presented credentials against the configured secret.
///
/// Empty header values count as absent. On success returns the caller's
/// device id. Header values are never logged.
pub fn verify_credentials(
    configured_key: &str,
    api_key: Option<&str>,
    device_id: Option<&str>,
) -> Result<String, AuthError> {
    let api_key = api_key.filter(|k| !k.is_empty());
    let device_id = device_id.filter(|d| !d.is_empty());

    if configured_key.is_empty() {
        return Ok(device_id.unwrap_or(UNKNOWN_DEVICE).to_string());
    }

    let result = match (api_key, device_id) {
        (None, _) => Err(AuthError::MissingApiKey),
        (Some(key), _) if !keys_match(key, configured_key) => Err(AuthError::InvalidApiKey),
        (Some(_), None) => Err(AuthError::MissingDeviceId),
        (Some(_), Some(device)) => Ok(device.to_string()),
    };

    if let Err(err) = &result {
        warn!(reason = err.reason(), "Credential check failed");
    }

    result
}

fn keys_match(presented: &str, configured: &str) -> bool {
    presented.as_bytes().ct_eq(configured.as_bytes()).into()
}

/// Extractor that runs the gate and yields the caller's device id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId(pub String);

#[async_trait]
impl FromRequestParts<AppState> for DeviceId {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = |name: &str| parts.headers.get(name).and_then(|v| v.to_str().ok());

        verify_credentials(
            &state.config.api_key,
            header(API_KEY_HEADER),
            header(DEVICE_ID_HEADER),
        )
        .map(DeviceId)
        .map_err(ApiError::from)
    }
}
