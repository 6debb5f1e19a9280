// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analyze;
pub mod auth;
pub mod embed;
pub mod errors;
pub mod handlers;
pub mod http_server;

pub use analyze::{analyze_handler, AnalyzeRequest, AnalyzeResponse, TagItem};
pub use auth::{verify_credentials, AuthError, DeviceId, API_KEY_HEADER, DEVICE_ID_HEADER};
pub use embed::{
    embed_handler, search_embed_handler, EmbedRequest, EmbedResponse, SearchEmbedRequest,
    SearchEmbedResponse,
};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, HealthResponse};
pub use http_server::{create_app, start_server, AppState};
