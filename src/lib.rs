// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod upstream;
pub mod version;
pub mod vision;

pub use api::{create_app, start_server, ApiError, AppState};
pub use config::{AppConfig, ConfigArgs, ConfigError};
pub use embeddings::{AzureEmbeddingClient, EmbeddingProvider};
pub use upstream::{ErrorClass, UpstreamError};
pub use vision::{AnalysisResult, AzureVisionClient, Tag, VisionProvider};
