// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! JSON-over-HTTP helper for Azure OpenAI style endpoints

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;

use super::error::UpstreamError;

/// Header carrying the provider key for Azure OpenAI deployments
const AZURE_API_KEY_HEADER: &str = "api-key";

/// Build the HTTP client shared by every provider client.
///
/// Timeouts live here and nowhere else; handlers never impose their own.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// POST `body` as JSON to `url` and decode the JSON reply.
///
/// Non-success statuses become `UpstreamError::Status` carrying an excerpt of
/// the response body; transport failures keep their timeout/connect nature.
pub async fn post_json<B, R>(
    client: &Client,
    url: &str,
    api_version: &str,
    api_key: &str,
    body: &B,
) -> Result<R, UpstreamError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut request = client
        .post(url)
        .query(&[("api-version", api_version)])
        .json(body);

    if !api_key.is_empty() {
        request = request.header(AZURE_API_KEY_HEADER, api_key);
    }

    let response = request.send().await?;
    let status = response.status();
    debug!("Upstream responded {} for {}", status, url);

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(UpstreamError::from_status(status, &text));
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode(e.to_string()))
}
