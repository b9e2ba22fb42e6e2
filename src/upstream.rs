//! The one outbound call: POST the payload to `generateContent`.

use axum::body::Bytes;
use reqwest::Client;
use serde::de::IgnoredAny;
use tracing::debug;

use crate::config::ProxyConfig;
use crate::error::{ProxyError, Result};
use crate::payload::GenerateContentRequest;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    url: String,
}

impl GeminiClient {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            url: config.generate_content_url(),
        })
    }

    /// Sends `payload` once. A 2xx body is checked to be JSON and returned
    /// byte for byte; anything else becomes [`ProxyError::Upstream`] carrying
    /// the raw body text.
    pub async fn generate(&self, api_key: &str, payload: &GenerateContentRequest) -> Result<Bytes> {
        debug!(url = %self.url, "calling upstream");

        let res = self
            .client
            .post(&self.url)
            .query(&[("key", api_key)])
            .json(payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await?;
            return Err(ProxyError::Upstream { status, body });
        }

        let bytes = res.bytes().await?;
        debug!(status = status.as_u16(), len = bytes.len(), "upstream replied");
        serde_json::from_slice::<IgnoredAny>(&bytes).map_err(ProxyError::InvalidUpstreamBody)?;
        Ok(bytes)
    }
}
