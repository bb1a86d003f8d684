//! HTTP client for a running recorder service.

use anyhow::{Context, Result};

use crate::session::SessionStatus;

/// Client for the control endpoints.
pub struct ControlsClient {
    client: reqwest::Client,
    base_url: String,
}

impl ControlsClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn tap_record(&self) -> Result<SessionStatus> {
        self.post("record").await
    }

    pub async fn tap_play(&self) -> Result<SessionStatus> {
        self.post("play").await
    }

    pub async fn status(&self) -> Result<SessionStatus> {
        let url = format!("{}/status", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach recorder service. Is it running?")?;

        Self::parse(response).await
    }

    async fn post(&self, control: &str) -> Result<SessionStatus> {
        let url = format!("{}/{}", self.base_url, control);

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .context("Failed to reach recorder service. Is it running?")?;

        Self::parse(response).await
    }

    async fn parse(response: reqwest::Response) -> Result<SessionStatus> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Recorder service error ({}): {}",
                status,
                body
            ));
        }

        serde_json::from_str(&body).context("Failed to parse status response")
    }
}
