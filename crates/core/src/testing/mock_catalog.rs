//! Mock movie catalog for controller tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, FilterState, Genre, Movie, MovieCatalog, Video};

/// A recorded catalog call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCall {
    Genres,
    Trending,
    Discover(FilterState),
    Search { query: String, year: Option<i32> },
    Movie(u32),
    Videos(u32),
}

/// Mock implementation of the MovieCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Configurable genres, trending, discover and search results
/// - Per-movie details, videos and failures
/// - Persistent per-endpoint failures
/// - Per-query search delays, for overlapping-request tests
/// - Recorded calls
#[derive(Debug, Default)]
pub struct MockCatalog {
    genres: RwLock<Vec<Genre>>,
    trending: RwLock<Vec<Movie>>,
    discover: RwLock<Vec<Movie>>,
    /// Search results keyed by query; unknown queries return nothing.
    search: RwLock<HashMap<String, Vec<Movie>>>,
    movies: RwLock<HashMap<u32, Movie>>,
    videos: RwLock<HashMap<u32, Vec<Video>>>,
    /// Failures keyed by endpoint name ("genres", "trending", ...).
    failures: RwLock<HashMap<&'static str, CatalogError>>,
    movie_failures: RwLock<HashMap<u32, CatalogError>>,
    search_delays: RwLock<HashMap<String, Duration>>,
    calls: RwLock<Vec<CatalogCall>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_genres(&self, genres: Vec<Genre>) {
        *self.genres.write().await = genres;
    }

    pub async fn set_trending(&self, movies: Vec<Movie>) {
        *self.trending.write().await = movies;
    }

    pub async fn set_discover(&self, movies: Vec<Movie>) {
        *self.discover.write().await = movies;
    }

    pub async fn set_search(&self, query: &str, movies: Vec<Movie>) {
        self.search.write().await.insert(query.to_string(), movies);
    }

    /// Make `movie` available to detail lookups.
    pub async fn add_movie(&self, movie: Movie) {
        self.movies.write().await.insert(movie.id, movie);
    }

    pub async fn set_videos(&self, movie_id: u32, videos: Vec<Video>) {
        self.videos.write().await.insert(movie_id, videos);
    }

    /// Fail every call to `endpoint` until [`MockCatalog::clear_failures`].
    pub async fn fail(&self, endpoint: &'static str, error: CatalogError) {
        self.failures.write().await.insert(endpoint, error);
    }

    /// Fail detail lookups for one movie.
    pub async fn fail_movie(&self, movie_id: u32, error: CatalogError) {
        self.movie_failures.write().await.insert(movie_id, error);
    }

    pub async fn clear_failures(&self) {
        self.failures.write().await.clear();
        self.movie_failures.write().await.clear();
    }

    /// Hold searches for `query` for `delay` before answering.
    pub async fn delay_search(&self, query: &str, delay: Duration) {
        self.search_delays
            .write()
            .await
            .insert(query.to_string(), delay);
    }

    pub async fn calls(&self) -> Vec<CatalogCall> {
        self.calls.read().await.clone()
    }

    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }

    async fn record(&self, endpoint: &'static str, call: CatalogCall) -> Result<(), CatalogError> {
        self.calls.write().await.push(call);
        match self.failures.read().await.get(endpoint) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MovieCatalog for MockCatalog {
    async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        self.record("genres", CatalogCall::Genres).await?;
        Ok(self.genres.read().await.clone())
    }

    async fn trending(&self) -> Result<Vec<Movie>, CatalogError> {
        self.record("trending", CatalogCall::Trending).await?;
        Ok(self.trending.read().await.clone())
    }

    async fn discover(&self, filters: &FilterState) -> Result<Vec<Movie>, CatalogError> {
        self.record("discover", CatalogCall::Discover(*filters))
            .await?;
        Ok(self.discover.read().await.clone())
    }

    async fn search(&self, query: &str, year: Option<i32>) -> Result<Vec<Movie>, CatalogError> {
        let call = CatalogCall::Search {
            query: query.to_string(),
            year,
        };
        self.record("search", call).await?;

        let delay = self.search_delays.read().await.get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self
            .search
            .read()
            .await
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    async fn movie(&self, id: u32) -> Result<Movie, CatalogError> {
        self.record("movie", CatalogCall::Movie(id)).await?;
        if let Some(error) = self.movie_failures.read().await.get(&id) {
            return Err(error.clone());
        }
        self.movies
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::RemoteApi {
                status: 404,
                message: "The resource you requested could not be found.".to_string(),
            })
    }

    async fn videos(&self, id: u32) -> Result<Vec<Video>, CatalogError> {
        self.record("videos", CatalogCall::Videos(id)).await?;
        Ok(self
            .videos
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }
}
