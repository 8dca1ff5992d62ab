//! Testing utilities and mock implementations.
//!
//! This module provides mocks for the catalog transport, the catalog itself,
//! the clock and the renderer, so the client and the controller can be
//! exercised end to end without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use moviedeck_core::testing::{fixtures, MockCatalog, RecordingRenderer};
//!
//! let catalog = Arc::new(MockCatalog::new());
//! catalog.set_trending(fixtures::movies(3)).await;
//!
//! let renderer = Arc::new(RecordingRenderer::new());
//! let controller = Controller::new(catalog.clone(), favorites, renderer.clone());
//! controller.start().await?;
//!
//! assert_eq!(renderer.trending().len(), 1);
//! ```

mod manual_clock;
mod mock_catalog;
mod mock_transport;
mod recording_renderer;

pub use manual_clock::ManualClock;
pub use mock_catalog::{CatalogCall, MockCatalog};
pub use mock_transport::MockTransport;
pub use recording_renderer::{RecordedRender, RecordingRenderer};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::catalog::{Genre, Movie, Video};

    /// Create a test movie with reasonable defaults.
    pub fn movie(id: u32, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            overview: format!("A movie about {}.", title.to_lowercase()),
            release_date: Some("2020-06-15".to_string()),
            poster_path: Some(format!("/poster{}.jpg", id)),
            backdrop_path: None,
            vote_average: Some(7.0),
            genre_ids: Vec::new(),
            genres: Vec::new(),
            popularity: 10.0,
            runtime: None,
            tagline: None,
        }
    }

    /// Create `count` movies with IDs 1..=count and decreasing popularity.
    pub fn movies(count: u32) -> Vec<Movie> {
        (1..=count)
            .map(|i| {
                let mut m = movie(i, &format!("Movie {}", i));
                m.popularity = 1000.0 - i as f64;
                m
            })
            .collect()
    }

    /// A small genre list.
    pub fn genres() -> Vec<Genre> {
        [(28, "Action"), (35, "Comedy"), (18, "Drama"), (878, "Science Fiction")]
            .into_iter()
            .map(|(id, name)| Genre {
                id,
                name: name.to_string(),
            })
            .collect()
    }

    /// Genre list endpoint body.
    pub fn genres_body() -> Value {
        json!({ "genres": genres() })
    }

    /// Paged results body, as returned by list endpoints.
    pub fn results_body(movies: &[Movie]) -> Value {
        json!({
            "page": 1,
            "results": movies,
            "total_pages": 1,
            "total_results": movies.len(),
        })
    }

    /// Videos endpoint body.
    pub fn videos_body(videos: &[Video]) -> Value {
        json!({ "id": 1, "results": videos })
    }

    /// A YouTube trailer.
    pub fn trailer(key: &str, official: bool) -> Video {
        Video {
            key: key.to_string(),
            name: format!("Trailer {}", key),
            site: "YouTube".to_string(),
            kind: "Trailer".to_string(),
            official,
        }
    }
}
