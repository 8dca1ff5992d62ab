//! Renderer that records what the controller asked it to draw.

use std::sync::Mutex;

use crate::controller::{ListView, MovieCard, MovieDetail, Renderer, Section};

/// One renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRender {
    Loading(Section),
    Trending(Vec<MovieCard>),
    List(ListView),
    Detail(MovieDetail),
    Favorite { movie_id: u32, is_favorite: bool },
    Error { section: Section, message: String },
    Fatal(String),
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RecordedRender>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedRender> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Every trending render, oldest first.
    pub fn trending(&self) -> Vec<Vec<MovieCard>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RecordedRender::Trending(cards) => Some(cards),
                _ => None,
            })
            .collect()
    }

    /// Every list render, oldest first.
    pub fn lists(&self) -> Vec<ListView> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RecordedRender::List(view) => Some(view),
                _ => None,
            })
            .collect()
    }

    pub fn last_list(&self) -> Option<ListView> {
        self.lists().pop()
    }

    pub fn details(&self) -> Vec<MovieDetail> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RecordedRender::Detail(detail) => Some(detail),
                _ => None,
            })
            .collect()
    }

    /// Section errors as `(section, message)`.
    pub fn errors(&self) -> Vec<(Section, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RecordedRender::Error { section, message } => Some((section, message)),
                _ => None,
            })
            .collect()
    }

    pub fn fatals(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RecordedRender::Fatal(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: RecordedRender) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Renderer for RecordingRenderer {
    fn render_loading(&self, section: Section) {
        self.push(RecordedRender::Loading(section));
    }

    fn render_trending(&self, movies: &[MovieCard]) {
        self.push(RecordedRender::Trending(movies.to_vec()));
    }

    fn render_list(&self, view: &ListView) {
        self.push(RecordedRender::List(view.clone()));
    }

    fn render_detail(&self, detail: &MovieDetail) {
        self.push(RecordedRender::Detail(detail.clone()));
    }

    fn render_favorite(&self, movie_id: u32, is_favorite: bool) {
        self.push(RecordedRender::Favorite {
            movie_id,
            is_favorite,
        });
    }

    fn render_error(&self, section: Section, message: &str) {
        self.push(RecordedRender::Error {
            section,
            message: message.to_string(),
        });
    }

    fn render_fatal(&self, message: &str) {
        self.push(RecordedRender::Fatal(message.to_string()));
    }
}
