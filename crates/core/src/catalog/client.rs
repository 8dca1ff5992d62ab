//! Catalog API client with a time-boxed response cache.
//!
//! Genre list, trending, movie details and movie videos are served from the
//! cache while fresh. Discover and search results are too volatile (and too
//! combinatorial) to be worth caching and always hit the network.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::transport::HttpTransport;
use super::types::{FilterState, Genre, Movie, Video};
use super::{CatalogError, MovieCatalog};
use crate::cache::{CacheError, CacheStore, Clock, SystemClock};
use crate::metrics::{
    CACHE_LOOKUPS, CACHE_WRITE_FAILURES, CATALOG_REQUESTS, CATALOG_REQUEST_DURATION,
};

const GENRES_CACHE_KEY: &str = "catalog_genres";
const TRENDING_CACHE_KEY: &str = "catalog_trending";

/// Freshness window of `n` hours, saturating instead of wrapping.
fn hours(n: u64) -> Duration {
    Duration::from_secs(n.saturating_mul(3600))
}

/// Catalog API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// API key (required).
    /// Can use ${ENV_VAR} syntax to read from environment.
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Image base URL for posters/backdrops.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Response language.
    #[serde(default = "default_language")]
    pub language: String,
    /// Request timeout in seconds (default: 15).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How many trending movies to keep (default: 10).
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,
    /// Unfiltered discover requests pick a page in `1..=random_page_max` (default: 10).
    #[serde(default = "default_random_page_max")]
    pub random_page_max: u32,
}

impl CatalogConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
            trending_limit: default_trending_limit(),
            random_page_max: default_random_page_max(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_trending_limit() -> usize {
    10
}

fn default_random_page_max() -> u32 {
    10
}

/// Freshness windows for cached endpoints, in hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    #[serde(default = "default_long_ttl")]
    pub genres_hours: u64,
    #[serde(default = "default_trending_ttl")]
    pub trending_hours: u64,
    #[serde(default = "default_long_ttl")]
    pub movie_hours: u64,
    #[serde(default = "default_long_ttl")]
    pub videos_hours: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            genres_hours: default_long_ttl(),
            trending_hours: default_trending_ttl(),
            movie_hours: default_long_ttl(),
            videos_hours: default_long_ttl(),
        }
    }
}

fn default_long_ttl() -> u64 {
    24
}

fn default_trending_ttl() -> u64 {
    1
}

/// Catalog API client.
pub struct CatalogClient {
    transport: Arc<dyn HttpTransport>,
    cache: CacheStore,
    clock: Arc<dyn Clock>,
    config: CatalogConfig,
    ttl: CacheTtlConfig,
}

impl CatalogClient {
    /// Create a new catalog client.
    pub fn new(
        config: CatalogConfig,
        ttl: CacheTtlConfig,
        transport: Arc<dyn HttpTransport>,
        cache: CacheStore,
    ) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "catalog API key is required".to_string(),
            ));
        }

        Ok(Self {
            transport,
            cache,
            clock: Arc::new(SystemClock),
            config,
            ttl,
        })
    }

    /// Replace the clock used for cache freshness.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Fetch `url` through the cache entry `cache_key`.
    ///
    /// A fresh entry is returned without touching the network. Stale or
    /// malformed entries are dropped and refetched. Failing to write the new
    /// entry never fails the call.
    pub async fn fetch_cached(
        &self,
        endpoint: &'static str,
        cache_key: &str,
        url: &str,
        freshness: Duration,
    ) -> Result<Value, CatalogError> {
        let now = self.clock.now_millis();

        match self.cache.get(cache_key) {
            Ok(Some(entry)) if entry.is_fresh(now, freshness) => {
                debug!("Cache hit: key={}, age_ms={}", cache_key, entry.age_ms(now));
                CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                return Ok(entry.data);
            }
            Ok(Some(entry)) => {
                debug!("Cache stale: key={}, age_ms={}", cache_key, entry.age_ms(now));
                CACHE_LOOKUPS.with_label_values(&["stale"]).inc();
                self.discard(cache_key);
            }
            Ok(None) => {
                CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
            }
            Err(CacheError::Malformed { reason, .. }) => {
                warn!("Discarding malformed cache entry {}: {}", cache_key, reason);
                CACHE_LOOKUPS.with_label_values(&["malformed"]).inc();
                self.discard(cache_key);
            }
            Err(e) => {
                warn!("Cache read failed for {}: {}", cache_key, e);
                CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
            }
        }

        let data = self.fetch_direct(endpoint, url).await?;

        if let Err(e) = self.cache.set(cache_key, &data, self.clock.now_millis()) {
            warn!("Failed to cache {}: {}", cache_key, e);
            CACHE_WRITE_FAILURES.inc();
        }

        Ok(data)
    }

    /// Fetch `url` from the network, bypassing the cache.
    pub async fn fetch_direct(
        &self,
        endpoint: &'static str,
        url: &str,
    ) -> Result<Value, CatalogError> {
        debug!("Catalog request: endpoint={}", endpoint);
        let started = Instant::now();

        let result = self.transport.get(url).await;
        CATALOG_REQUEST_DURATION
            .with_label_values(&[endpoint])
            .observe(started.elapsed().as_secs_f64());

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                CATALOG_REQUESTS.with_label_values(&[endpoint, "error"]).inc();
                return Err(e);
            }
        };

        if !response.is_success() {
            CATALOG_REQUESTS.with_label_values(&[endpoint, "error"]).inc();
            return Err(remote_error(response.status, &response.body));
        }

        CATALOG_REQUESTS.with_label_values(&[endpoint, "success"]).inc();
        serde_json::from_str(&response.body).map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse {} response: {}", endpoint, e))
        })
    }

    /// Page requested by a discover call with these filters.
    pub fn discover_page(&self, filters: &FilterState) -> u32 {
        if filters.is_empty() {
            rand::thread_rng().gen_range(1..=self.config.random_page_max.max(1))
        } else {
            1
        }
    }

    /// Discover URL for `filters` at `page`.
    pub fn discover_url(&self, filters: &FilterState, page: u32) -> String {
        let mut params = vec![
            ("include_adult", "false".to_string()),
            ("page", page.to_string()),
        ];
        if let Some(genre) = filters.genre {
            params.push(("with_genres", genre.to_string()));
        }
        if let Some(year) = filters.year {
            params.push(("primary_release_year", year.to_string()));
        }
        if let Some(sort) = filters.sort {
            params.push(("sort_by", sort.as_str().to_string()));
        }
        self.url("/discover/movie", &params)
    }

    /// Search URL for `query`, optionally narrowed to `year`.
    pub fn search_url(&self, query: &str, year: Option<i32>) -> String {
        let mut params = vec![
            ("query", query.to_string()),
            ("include_adult", "false".to_string()),
            ("page", "1".to_string()),
        ];
        if let Some(year) = year {
            params.push(("primary_release_year", year.to_string()));
        }
        self.url("/search/movie", &params)
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}&language={}",
            self.config.base_url.trim_end_matches('/'),
            path,
            urlencoding::encode(&self.config.api_key),
            urlencoding::encode(&self.config.language),
        );
        for (name, value) in params {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    fn discard(&self, cache_key: &str) {
        if let Err(e) = self.cache.remove(cache_key) {
            warn!("Failed to discard cache entry {}: {}", cache_key, e);
        }
    }
}

#[async_trait]
impl MovieCatalog for CatalogClient {
    async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let url = self.url("/genre/movie/list", &[]);
        let freshness = hours(self.ttl.genres_hours);
        let body = self
            .fetch_cached("genres", GENRES_CACHE_KEY, &url, freshness)
            .await?;
        Ok(decode::<GenreListResponse>("genres", body)?.genres)
    }

    async fn trending(&self) -> Result<Vec<Movie>, CatalogError> {
        let url = self.url("/trending/movie/week", &[]);
        let freshness = hours(self.ttl.trending_hours);
        let body = self
            .fetch_cached("trending", TRENDING_CACHE_KEY, &url, freshness)
            .await?;

        let mut movies = decode::<ResultsResponse<Movie>>("trending", body)?.results;
        movies.truncate(self.config.trending_limit);
        Ok(movies)
    }

    async fn discover(&self, filters: &FilterState) -> Result<Vec<Movie>, CatalogError> {
        let page = self.discover_page(filters);
        debug!("Discover: filters={:?}, page={}", filters, page);

        let url = self.discover_url(filters, page);
        let body = self.fetch_direct("discover", &url).await?;
        Ok(decode::<ResultsResponse<Movie>>("discover", body)?.results)
    }

    async fn search(&self, query: &str, year: Option<i32>) -> Result<Vec<Movie>, CatalogError> {
        debug!("Search: query='{}', year={:?}", query, year);

        let url = self.search_url(query, year);
        let body = self.fetch_direct("search", &url).await?;
        Ok(decode::<ResultsResponse<Movie>>("search", body)?.results)
    }

    async fn movie(&self, id: u32) -> Result<Movie, CatalogError> {
        let url = self.url(&format!("/movie/{}", id), &[]);
        let freshness = hours(self.ttl.movie_hours);
        let body = self
            .fetch_cached("movie", &movie_cache_key(id), &url, freshness)
            .await?;
        decode("movie", body)
    }

    async fn videos(&self, id: u32) -> Result<Vec<Video>, CatalogError> {
        let url = self.url(&format!("/movie/{}/videos", id), &[]);
        let freshness = hours(self.ttl.videos_hours);
        let body = self
            .fetch_cached("videos", &videos_cache_key(id), &url, freshness)
            .await?;
        Ok(decode::<ResultsResponse<Video>>("videos", body)?.results)
    }
}

/// Cache key for a movie's details.
pub fn movie_cache_key(id: u32) -> String {
    format!("catalog_movie_{}", id)
}

/// Cache key for a movie's videos.
pub fn videos_cache_key(id: u32) -> String {
    format!("catalog_movie_{}_videos", id)
}

/// Build the error for a non-success response, preferring the server's message.
fn remote_error(status: u16, body: &str) -> CatalogError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.status_message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP error! status: {}", status));

    CatalogError::RemoteApi { status, message }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: Value) -> Result<T, CatalogError> {
    serde_json::from_value(body).map_err(|e| {
        CatalogError::ParseError(format!("Failed to parse {} response: {}", endpoint, e))
    })
}

// ============================================================================
// API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ResultsResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    status_message: Option<String>,
}
