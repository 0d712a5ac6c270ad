//! HTTP access to the image provider.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::config::BackdropSettings;
use crate::error::{BackdropError, Result};

/// User agent string for provider requests.
const USER_AGENT_VALUE: &str = concat!("portal/", env!("CARGO_PKG_VERSION"));

/// Fetches the raw response body of an image provider endpoint.
pub trait ImageFetcher: Send + Sync {
    /// `GET endpoint` and return the body text.
    fn fetch(&self, endpoint: &str) -> impl Future<Output = Result<String>> + Send;
}

impl<F: ImageFetcher> ImageFetcher for Arc<F> {
    fn fetch(&self, endpoint: &str) -> impl Future<Output = Result<String>> + Send {
        self.as_ref().fetch(endpoint)
    }
}

/// Provider client over reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a client with the timeout from `settings`.
    pub fn new(settings: &BackdropSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT_VALUE)
            .timeout(settings.timeout())
            .build()
            .map_err(|e| BackdropError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, endpoint: &str) -> Result<String> {
        tracing::debug!("Fetching background images from {}", endpoint);

        let response = self.client.get(endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackdropError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
