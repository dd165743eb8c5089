// LucidQuant - Fetch Client
// One GET per call, browser identity, bounded wait, no retries

use crate::error::{ClientSetupError, FetchError};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Desktop Chrome identity sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Whole-request limit (connect, headers and body) for one page fetch
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of raw page documents. The refresh pipeline only sees this trait,
/// so tests can hand it canned pages or canned failures.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url).await
    }
}

/// `PageFetcher` over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ClientSetupError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ClientSetupError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "fetching source page");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_failure(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::new(url, format!("HTTP Error: {}", status)));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| request_failure(url, e))?;

        if body.trim().is_empty() {
            return Err(FetchError::new(url, "empty body"));
        }

        debug!(url, bytes = body.len(), "source page fetched");
        Ok(body)
    }
}

fn request_failure(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::new(url, "timed out")
    } else {
        FetchError::new(url, e.to_string())
    }
}
