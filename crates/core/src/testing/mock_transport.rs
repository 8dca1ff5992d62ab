//! Mock HTTP transport for testing the catalog client.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, HttpResponse, HttpTransport};

/// Mock implementation of the HttpTransport trait.
///
/// Responses are routed by URL path (query string ignored). Unrouted paths
/// answer 404 with a catalog-style error body. Every requested URL is
/// recorded for assertions.
///
/// # Example
///
/// ```rust,ignore
/// let transport = MockTransport::new();
/// transport.set_json("/genre/movie/list", fixtures::genres_body()).await;
///
/// let response = transport.get("https://api.test/3/genre/movie/list?api_key=k").await?;
/// assert_eq!(response.status, 200);
/// assert_eq!(transport.request_count().await, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Responses keyed by path suffix.
    routes: RwLock<HashMap<String, HttpResponse>>,
    /// Requested URLs, in order.
    requests: RwLock<Vec<String>>,
    /// If set, the next request will fail with this error.
    next_error: RwLock<Option<CatalogError>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with a 200 JSON body.
    pub async fn set_json(&self, path: &str, body: Value) {
        self.set_response(path, 200, &body.to_string()).await;
    }

    /// Answer `path` with an arbitrary status and body.
    pub async fn set_response(&self, path: &str, status: u16, body: &str) {
        self.routes.write().await.insert(
            path.to_string(),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        );
    }

    /// Fail the next request with `error`.
    pub async fn fail_next(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    pub async fn requested_urls(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

/// Path portion of `url`, without scheme, host or query.
fn path_of(url: &str) -> &str {
    let without_query = url.split('?').next().unwrap_or(url);
    let without_scheme = without_query
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(without_query);
    without_scheme
        .find('/')
        .map(|i| &without_scheme[i..])
        .unwrap_or("/")
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, CatalogError> {
        self.requests.write().await.push(url.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let path = path_of(url);
        let routes = self.routes.read().await;
        // Longest matching suffix wins, so "/movie/1/videos" beats "/videos".
        let response = routes
            .iter()
            .filter(|(route, _)| path.ends_with(route.as_str()))
            .max_by_key(|(route, _)| route.len())
            .map(|(_, response)| response.clone());

        Ok(response.unwrap_or_else(|| HttpResponse {
            status: 404,
            body: r#"{"status_code": 34, "status_message": "The resource you requested could not be found."}"#
                .to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_of() {
        assert_eq!(path_of("https://api.test/3/movie/1?api_key=x"), "/3/movie/1");
        assert_eq!(path_of("https://api.test"), "/");
    }

    #[tokio::test]
    async fn test_routes_by_suffix() {
        let transport = MockTransport::new();
        transport.set_json("/movie/1", json!({"id": 1})).await;
        transport.set_json("/movie/1/videos", json!({"results": []})).await;

        let detail = transport.get("https://api.test/3/movie/1?a=b").await.unwrap();
        assert!(detail.body.contains("\"id\":1"));

        let videos = transport.get("https://api.test/3/movie/1/videos").await.unwrap();
        assert!(videos.body.contains("results"));

        let missing = transport.get("https://api.test/3/movie/2").await.unwrap();
        assert_eq!(missing.status, 404);
        assert_eq!(transport.request_count().await, 3);
    }

    #[tokio::test]
    async fn test_fail_next_only_once() {
        let transport = MockTransport::new();
        transport.fail_next(CatalogError::Timeout).await;

        assert!(transport.get("https://api.test/x").await.is_err());
        assert!(transport.get("https://api.test/x").await.is_ok());
    }
}
