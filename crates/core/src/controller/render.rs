//! Rendering layer contract.
//!
//! The controller never draws anything itself. It hands plain data and
//! view-state signals to a [`Renderer`], which owns the actual output.

use serde::Serialize;

use super::state::ViewMode;
use crate::catalog::{Movie, Video};

/// Display section a signal applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Trending strip.
    Trending,
    /// Main movie list (discover, search results or favorites).
    Main,
    /// Movie detail view.
    Detail,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Trending => "trending",
            Section::Main => "main",
            Section::Detail => "detail",
        }
    }
}

/// A movie prepared for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    pub movie: Movie,
    /// Resolved genre names.
    pub genres: Vec<String>,
    pub is_favorite: bool,
}

/// Content of the main list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListContent {
    Movies(Vec<MovieCard>),
    /// Nothing to show; carries the empty-state message.
    Empty(String),
}

/// Everything needed to draw the main list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView {
    pub mode: ViewMode,
    pub title: String,
    /// Drives the reset affordance and the discover title.
    pub has_active_filters: bool,
    pub content: ListContent,
}

impl ListView {
    /// Movies shown, empty for the empty state.
    pub fn movies(&self) -> &[MovieCard] {
        match &self.content {
            ListContent::Movies(cards) => cards,
            ListContent::Empty(_) => &[],
        }
    }
}

/// Movie detail with its selected trailer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetail {
    pub movie: Movie,
    pub genres: Vec<String>,
    pub trailer: Option<Video>,
    pub is_favorite: bool,
}

/// Consumer of controller output.
pub trait Renderer: Send + Sync {
    /// A section is about to be refreshed.
    fn render_loading(&self, _section: Section) {}

    /// Trending movies, in rank order.
    fn render_trending(&self, movies: &[MovieCard]);

    /// Main list.
    fn render_list(&self, view: &ListView);

    /// Movie detail.
    fn render_detail(&self, detail: &MovieDetail);

    /// New favorite membership of a movie.
    fn render_favorite(&self, movie_id: u32, is_favorite: bool);

    /// Error confined to one section.
    fn render_error(&self, section: Section, message: &str);

    /// Blocking error; the app is unusable.
    fn render_fatal(&self, message: &str);
}
