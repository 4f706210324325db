use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::de::IgnoredAny;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Prediction;
use crate::view::PredictionSource;

const TODAY_PATH: &str = "/api/v1/matches/today/";

/// Failures talking to the prediction API. The proxy collapses all of them
/// into one generic error for its callers; the variants exist for logging.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("prediction API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("malformed prediction payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the third-party prediction API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
    api_token: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str, api_token: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(UpstreamClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    fn today_url(&self) -> String {
        format!("{}{}", self.base_url, TODAY_PATH)
    }

    /// Fetch today's predictions as the exact bytes the API sent. The body
    /// must be a JSON array but its records are not interpreted, so unknown
    /// fields and timestamp offsets survive untouched. No retry.
    pub async fn fetch_today_raw(&self) -> Result<Bytes, UpstreamError> {
        let url = self.today_url();
        debug!("Fetching predictions from {}", url);

        let resp = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Token {}", self.api_token))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("Prediction API error {}: {}", status, body);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        let records: Vec<IgnoredAny> = serde_json::from_slice(&body)?;
        info!("Fetched {} predictions from upstream", records.len());
        Ok(body)
    }

    /// Fetch today's predictions decoded into `Prediction` records.
    pub async fn fetch_today(&self) -> Result<Vec<Prediction>, UpstreamError> {
        let body = self.fetch_today_raw().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl PredictionSource for UpstreamClient {
    fn name(&self) -> &str {
        "upstream"
    }

    async fn fetch_predictions(&self) -> anyhow::Result<Vec<Prediction>> {
        Ok(self.fetch_today().await?)
    }
}
