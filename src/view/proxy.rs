use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::source::PredictionSource;
use crate::models::Prediction;

/// Error payload returned by the proxy endpoint
#[derive(Debug, Deserialize)]
struct ProxyErrorBody {
    error: String,
}

/// Reads predictions through the internal `/api/predictions` endpoint, so the
/// view never holds the upstream credential.
#[derive(Clone)]
pub struct ProxyClient {
    http: Client,
    url: Url,
}

impl ProxyClient {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ProxyClient { http, url })
    }
}

#[async_trait]
impl PredictionSource for ProxyClient {
    fn name(&self) -> &str {
        "proxy"
    }

    async fn fetch_predictions(&self) -> Result<Vec<Prediction>> {
        debug!("Polling prediction proxy at {}", self.url);

        let resp = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .context("Prediction proxy request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProxyErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            anyhow::bail!("Prediction proxy error {}: {}", status, message);
        }

        resp.json()
            .await
            .context("Failed to parse prediction proxy response")
    }
}
