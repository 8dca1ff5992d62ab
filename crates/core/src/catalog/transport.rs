//! HTTP transport used by the catalog client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::CatalogError;

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs GET requests against the catalog API.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetch `url`. Non-2xx statuses are returned, not raised.
    async fn get(&self, url: &str) -> Result<HttpResponse, CatalogError>;
}

/// `reqwest`-backed transport with a request timeout.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, CatalogError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout
                } else {
                    CatalogError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
