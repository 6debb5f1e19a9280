// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use mnemo_api::{
    api::start_server,
    config::{AppConfig, ConfigArgs},
    version,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables take precedence
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mnemo_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = ConfigArgs::parse();
    let config = AppConfig::from_args(args).context("invalid configuration")?;

    info!("Starting {}", version::get_version_string());
    info!(
        endpoint = %config.endpoint,
        api_version = %config.api_version,
        vision_deployment = %config.vision_deployment,
        embedding_deployment = %config.embedding_deployment,
        embedding_dimensions = config.embedding_dimensions,
        timeout_secs = config.request_timeout.as_secs(),
        "Upstream configuration loaded"
    );

    if config.upstream_api_key.is_empty() {
        warn!("AZURE_OPENAI_API_KEY is empty: upstream calls are sent without an api-key header");
    }
    info!(auth_enabled = config.auth_enabled(), "Credential gate configured");

    start_server(config).await
}
