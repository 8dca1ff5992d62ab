//! Movie catalog access.
//!
//! This module provides the catalog client used to browse the remote movie
//! database, with a time-boxed response cache for the endpoints whose
//! results are stable enough to reuse.

mod client;
mod transport;
mod types;

pub use client::{CacheTtlConfig, CatalogClient, CatalogConfig};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// Request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Catalog answered with a non-success status.
    #[error("{message}")]
    RemoteApi { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Catalog operations used by the controller.
///
/// Implemented by [`CatalogClient`] and by the mock in `testing`.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Full genre list.
    async fn genres(&self) -> Result<Vec<Genre>, CatalogError>;

    /// Top trending movies of the week, in server rank order.
    async fn trending(&self) -> Result<Vec<Movie>, CatalogError>;

    /// Discover movies matching `filters`.
    async fn discover(&self, filters: &FilterState) -> Result<Vec<Movie>, CatalogError>;

    /// Search movies by title, optionally narrowed to a release year.
    async fn search(&self, query: &str, year: Option<i32>) -> Result<Vec<Movie>, CatalogError>;

    /// Full movie details.
    async fn movie(&self, id: u32) -> Result<Movie, CatalogError>;

    /// Videos attached to a movie.
    async fn videos(&self, id: u32) -> Result<Vec<Video>, CatalogError>;
}
