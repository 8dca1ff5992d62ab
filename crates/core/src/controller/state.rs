//! Session state owned by the controller.

use serde::Serialize;

use super::render::{ListContent, ListView, MovieCard};
use crate::catalog::{FilterState, GenreIndex, Movie};
use crate::favorites::FavoritesSet;

/// Which list the main section shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Discover,
    Search,
    Favorites,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Discover => "discover",
            ViewMode::Search => "search",
            ViewMode::Favorites => "favorites",
        }
    }
}

/// Mutable session state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub genres: GenreIndex,
    pub favorites: FavoritesSet,
    pub filters: FilterState,
    pub query: String,
    pub mode: ViewMode,
}

impl SessionState {
    /// Any filter set, or a search query active.
    pub fn has_active_filters(&self) -> bool {
        self.list_request().has_active_filters()
    }

    pub fn title(&self) -> String {
        self.list_request().title()
    }

    /// The list the current mode, query and filters ask for.
    pub fn list_request(&self) -> ListRequest {
        ListRequest {
            mode: self.mode,
            query: self.query.clone(),
            filters: self.filters,
        }
    }

    pub fn card(&self, movie: Movie) -> MovieCard {
        MovieCard {
            genres: movie.genre_names(&self.genres),
            is_favorite: self.favorites.contains(movie.id),
            movie,
        }
    }

    /// Main list view for `movies` in the current mode.
    pub fn list_view(&self, movies: Vec<Movie>) -> ListView {
        self.list_view_for(&self.list_request(), movies)
    }

    /// Main list view for `movies` fetched for `request`.
    ///
    /// Title and empty state follow `request`, favorite flags and genre
    /// names follow the current state.
    pub fn list_view_for(&self, request: &ListRequest, movies: Vec<Movie>) -> ListView {
        let content = if movies.is_empty() {
            ListContent::Empty(request.empty_message())
        } else {
            ListContent::Movies(movies.into_iter().map(|m| self.card(m)).collect())
        };

        ListView {
            mode: request.mode,
            title: request.title(),
            has_active_filters: request.has_active_filters(),
            content,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            filters: self.filters,
            query: self.query.clone(),
            has_active_filters: self.has_active_filters(),
            favorites: self.favorites.clone(),
        }
    }
}

/// Mode, query and filters a main list request was issued with.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub mode: ViewMode,
    pub query: String,
    pub filters: FilterState,
}

impl ListRequest {
    pub fn has_active_filters(&self) -> bool {
        !self.filters.is_empty() || !self.query.is_empty()
    }

    pub fn title(&self) -> String {
        match self.mode {
            ViewMode::Discover if self.has_active_filters() => "Filtered Results".to_string(),
            ViewMode::Discover => "Discover Movies".to_string(),
            ViewMode::Search => format!("Results for \"{}\"", self.query),
            ViewMode::Favorites => "My Favorites".to_string(),
        }
    }

    fn empty_message(&self) -> String {
        match self.mode {
            ViewMode::Discover => "No movies found. Try adjusting your filters.".to_string(),
            ViewMode::Search => format!("No movies found for \"{}\".", self.query),
            ViewMode::Favorites => {
                "No favorites yet. Mark movies as favorites to see them here.".to_string()
            }
        }
    }
}

/// Read-only copy of the session state for renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub mode: ViewMode,
    pub filters: FilterState,
    pub query: String,
    pub has_active_filters: bool,
    pub favorites: FavoritesSet,
}
