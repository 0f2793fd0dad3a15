//! HTTP client for the upstream site.
//!
//! One `reqwest::Client` carries the browser-like headers and the single
//! per-request timeout used for every upstream call. No retries.

use crate::error::{Result, ScrapeError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::config::UpstreamConfig;
use std::time::Duration;
use tracing::debug;

/// Cheaply cloneable handle to the upstream site
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Build a client from the upstream settings
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Ok(referer) = HeaderValue::from_str(config.referer()) {
            headers.insert(REFERER, referer);
        }
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("pt-BR,pt;q=0.9,en;q=0.8"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(ScrapeError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        debug!(url = %url, "Requesting upstream");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScrapeError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UpstreamStatus {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }

    /// GET a page and return its body as text
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(url).await?;
        response.text().await.map_err(|source| ScrapeError::Transport {
            url: url.to_string(),
            source,
        })
    }

    /// GET a JSON document and decode it
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| ScrapeError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
