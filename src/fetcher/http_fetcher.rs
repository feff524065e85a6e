use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client;
use url::Url;

use crate::app::{BlogError, FetchError, Result};
use crate::config::FetcherConfig;
use crate::domain::{PageToken, RawPage};
use crate::fetcher::PageFetcher;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| BlogError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

/// Decodes a page body. Kept apart from the request so it can be tested offline.
pub fn decode_page(body: &[u8]) -> std::result::Result<RawPage, FetchError> {
    Ok(serde_json::from_slice(body)?)
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, token: &PageToken) -> std::result::Result<RawPage, FetchError> {
        let url = Url::parse(token.as_str())?;
        tracing::debug!("Fetching page {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        decode_page(&body)
    }
}
