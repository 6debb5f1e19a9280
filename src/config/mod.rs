// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Settings are read once at start-up from command-line flags, each of which
//! falls back to an environment variable (a `.env` file is honoured by `main`).
//! The validated `AppConfig` is immutable and shared by `Arc`.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::vision::image_utils::MAX_ENCODED_IMAGE_SIZE;

pub const DEFAULT_API_VERSION: &str = "2024-10-21";
pub const DEFAULT_VISION_DEPLOYMENT: &str = "gpt-5-mini";
pub const DEFAULT_EMBEDDING_DEPLOYMENT: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 512;
/// Room for the JSON envelope around the base64 image (`image_id`, hint, keys)
pub const BODY_ENVELOPE_BYTES: usize = 64 * 1024;

/// Largest body that can carry a maximum-size image
pub const DEFAULT_MAX_BODY_BYTES: usize = MAX_ENCODED_IMAGE_SIZE + BODY_ENVELOPE_BYTES;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("AZURE_OPENAI_ENDPOINT is required")]
    MissingEndpoint,

    #[error("invalid endpoint '{0}': must start with http:// or https://")]
    InvalidEndpoint(String),

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("EMBEDDING_DIMENSIONS must be greater than 0")]
    ZeroDimensions,

    #[error("UPSTREAM_TIMEOUT_SECONDS must be greater than 0")]
    ZeroTimeout,

    #[error("invalid listen address {host}:{port}")]
    InvalidListenAddr { host: String, port: u16 },
}

/// Screenshot analysis API server
#[derive(Parser, Debug, Clone)]
#[command(name = "mnemo-api")]
#[command(version)]
#[command(about = "Screenshot OCR, tagging and embedding API", long_about = None)]
pub struct ConfigArgs {
    /// Azure OpenAI resource endpoint, e.g. https://my-resource.openai.azure.com
    #[arg(long, env = "AZURE_OPENAI_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Key sent to the provider in the `api-key` header
    #[arg(long, env = "AZURE_OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    pub upstream_api_key: String,

    #[arg(long, env = "AZURE_OPENAI_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Chat-completion deployment used for OCR, description and tags
    #[arg(
        long,
        env = "AZURE_OPENAI_DEPLOYMENT_VISION",
        default_value = DEFAULT_VISION_DEPLOYMENT
    )]
    pub vision_deployment: String,

    #[arg(
        long,
        env = "AZURE_OPENAI_DEPLOYMENT_EMBEDDING",
        default_value = DEFAULT_EMBEDDING_DEPLOYMENT
    )]
    pub embedding_deployment: String,

    /// Shared secret clients send as X-API-Key. Empty disables authentication.
    #[arg(long, env = "API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "EMBEDDING_DIMENSIONS", default_value_t = DEFAULT_EMBEDDING_DIMENSIONS)]
    pub embedding_dimensions: usize,

    #[arg(long, env = "UPSTREAM_TIMEOUT_SECONDS", default_value_t = 60)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Largest accepted request body; base64 screenshots routinely exceed 2 MiB
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

/// Validated, immutable service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: String,
    pub upstream_api_key: String,
    pub api_version: String,
    pub vision_deployment: String,
    pub embedding_deployment: String,
    pub api_key: String,
    pub embedding_dimensions: usize,
    pub request_timeout: Duration,
    pub listen_addr: SocketAddr,
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Validate parsed arguments into a configuration
    pub fn from_args(args: ConfigArgs) -> Result<Self, ConfigError> {
        let endpoint = args
            .endpoint
            .map(|e| e.trim().trim_end_matches('/').to_string())
            .filter(|e| !e.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;

        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint(endpoint));
        }

        for (field, value) in [
            ("AZURE_OPENAI_API_VERSION", &args.api_version),
            ("AZURE_OPENAI_DEPLOYMENT_VISION", &args.vision_deployment),
            ("AZURE_OPENAI_DEPLOYMENT_EMBEDDING", &args.embedding_deployment),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField { field });
            }
        }

        if args.embedding_dimensions == 0 {
            return Err(ConfigError::ZeroDimensions);
        }

        if args.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let listen_addr: SocketAddr = format!("{}:{}", args.host, args.port)
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr {
                host: args.host.clone(),
                port: args.port,
            })?;

        Ok(Self {
            endpoint,
            upstream_api_key: args.upstream_api_key,
            api_version: args.api_version,
            vision_deployment: args.vision_deployment,
            embedding_deployment: args.embedding_deployment,
            api_key: args.api_key,
            embedding_dimensions: args.embedding_dimensions,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            listen_addr,
            max_body_bytes: args.max_body_bytes,
        })
    }

    /// Whether clients must present X-API-Key / X-Device-ID
    pub fn auth_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Configuration pointing at an unreachable local endpoint
    pub fn new_for_test() -> Self {
        Self {
            endpoint: "http://127.0.0.1:59999".to_string(),
            upstream_api_key: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            vision_deployment: DEFAULT_VISION_DEPLOYMENT.to_string(),
            embedding_deployment: DEFAULT_EMBEDDING_DEPLOYMENT.to_string(),
            api_key: String::new(),
            embedding_dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            request_timeout: Duration::from_secs(5),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}
