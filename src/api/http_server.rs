// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::analyze::analyze_handler;
use super::embed::{embed_handler, search_embed_handler};
use super::handlers::health_handler;
use crate::config::AppConfig;
use crate::embeddings::{AzureEmbeddingClient, EmbeddingProvider};
use crate::upstream::build_http_client;
use crate::vision::{AzureVisionClient, VisionProvider};

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub vision: Arc<dyn VisionProvider>,
    pub embeddings: Arc<dyn EmbeddingProvider>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        vision: Arc<dyn VisionProvider>,
        embeddings: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            vision,
            embeddings,
        }
    }

    /// Wire the Azure clients described by `config`
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let http = build_http_client(config.request_timeout)?;
        let vision = Arc::new(AzureVisionClient::new(http.clone(), &config));
        let embeddings = Arc::new(AzureEmbeddingClient::new(http, &config));
        Ok(Self::new(config, vision, embeddings))
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        // Health check (no auth)
        .route("/health", get(health_handler))
        // Screenshot analysis (gated)
        .route("/analyze", post(analyze_handler))
        // Embeddings
        .route("/embed", post(embed_handler))
        .route("/search/embed", post(search_embed_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: AppConfig) -> Result<()> {
    let addr = config.listen_addr;
    let auth_enabled = config.auth_enabled();
    let state = AppState::from_config(config)?;

    if !auth_enabled {
        tracing::warn!("API_KEY is not set: /analyze accepts unauthenticated requests");
    }

    info!(
        embedding_dimensions = state.embeddings.dimensions(),
        "Providers ready"
    );

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
