//! View-state controller.
//!
//! Turns user intents (search, filter changes, favorites, detail requests)
//! into session state transitions and catalog calls, and hands the results
//! to a [`Renderer`]. Intent handlers never return errors: failures are
//! rendered as errors scoped to the section that failed.

mod render;
mod sequence;
mod sort;
mod state;
mod trailer;

pub use render::{ListContent, ListView, MovieCard, MovieDetail, Renderer, Section};
pub use sequence::{RequestTicket, SectionSequencer};
pub use sort::sort_movies;
pub use state::{ListRequest, SessionSnapshot, SessionState, ViewMode};
pub use trailer::select_trailer;

use std::sync::Arc;

use futures::future::try_join_all;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogError, FilterState, Genre, GenreIndex, Movie, MovieCatalog};
use crate::favorites::{FavoritesError, FavoritesStore};
use crate::metrics::{INTENTS_HANDLED, STALE_RESPONSES_DROPPED};

/// Failure of the startup sequence itself.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load favorites: {0}")]
    Favorites(#[from] FavoritesError),

    #[error("Failed to load genres: {0}")]
    Genres(#[source] CatalogError),
}

/// Session controller.
pub struct Controller {
    catalog: Arc<dyn MovieCatalog>,
    favorites: FavoritesStore,
    renderer: Arc<dyn Renderer>,
    state: RwLock<SessionState>,
    sequencer: SectionSequencer,
}

impl Controller {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        favorites: FavoritesStore,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            catalog,
            favorites,
            renderer,
            state: RwLock::new(SessionState::default()),
            sequencer: SectionSequencer::new(),
        }
    }

    /// Copy of the current session state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.snapshot()
    }

    /// Genres known to this session, ordered by name.
    pub async fn genres(&self) -> Vec<Genre> {
        self.state.read().await.genres.sorted()
    }

    /// Load favorites and genres, then the trending and discover sections.
    ///
    /// Trending and discover failures are rendered as section errors and do
    /// not fail startup. Anything else is fatal.
    pub async fn start(&self) -> Result<(), InitializationError> {
        info!("Starting session");

        if let Err(e) = self.initialize().await {
            warn!("Initialization failed: {}", e);
            self.renderer
                .render_fatal(&format!("Failed to initialize app. {}", e));
            return Err(e);
        }

        self.load_trending().await;
        self.load_discover().await;
        Ok(())
    }

    async fn initialize(&self) -> Result<(), InitializationError> {
        let favorites = self.favorites.load()?;
        let genres = self
            .catalog
            .genres()
            .await
            .map_err(InitializationError::Genres)?;

        info!(
            "Session loaded: {} favorites, {} genres",
            favorites.len(),
            genres.len()
        );

        let mut state = self.state.write().await;
        state.favorites = favorites;
        state.genres = GenreIndex::new(genres);
        Ok(())
    }

    /// Refresh the trending section.
    pub async fn load_trending(&self) {
        let ticket = self.sequencer.begin(Section::Trending);
        self.renderer.render_loading(Section::Trending);

        let result = self.catalog.trending().await;
        if !self.accept(ticket) {
            return;
        }

        match result {
            Ok(movies) => {
                let state = self.state.read().await;
                let cards: Vec<MovieCard> = movies.into_iter().map(|m| state.card(m)).collect();
                drop(state);
                self.renderer.render_trending(&cards);
            }
            Err(e) => {
                warn!("Trending failed: {}", e);
                self.renderer.render_error(
                    Section::Trending,
                    &format!("Failed to load trending movies: {}", e),
                );
            }
        }
    }

    /// Refresh the main list with discover results for the current filters.
    pub async fn load_discover(&self) {
        let (ticket, request) = {
            let state = self.state.write().await;
            self.begin_main(&state)
        };
        self.fetch_discover(ticket, request).await;
    }

    async fn fetch_discover(&self, ticket: RequestTicket, request: ListRequest) {
        let result = self.catalog.discover(&request.filters).await;
        if !self.accept(ticket) {
            return;
        }

        match result {
            Ok(movies) => self.render_main(&request, movies).await,
            Err(e) => {
                warn!("Discover failed: {}", e);
                self.renderer
                    .render_error(Section::Main, &format!("Failed to load movies: {}", e));
            }
        }
    }

    /// Handle a settled search query. Debouncing is the caller's job.
    pub async fn search(&self, query: &str) {
        INTENTS_HANDLED.with_label_values(&["search"]).inc();

        let query = query.trim();
        if query.is_empty() {
            self.clear_all().await;
            return;
        }

        let (ticket, request) = {
            let mut state = self.state.write().await;
            state.query = query.to_string();
            state.mode = ViewMode::Search;
            self.begin_main(&state)
        };

        self.fetch_search(ticket, request).await;
    }

    async fn fetch_search(&self, ticket: RequestTicket, request: ListRequest) {
        let filters = request.filters;
        debug!("Searching '{}' with filters {:?}", request.query, filters);

        let result = self.catalog.search(&request.query, filters.year).await;
        if !self.accept(ticket) {
            return;
        }

        match result {
            Ok(movies) => {
                self.render_main(&request, sort_movies(&movies, filters.sort))
                    .await
            }
            Err(e) => {
                warn!("Search failed: {}", e);
                self.renderer
                    .render_error(Section::Main, &format!("Search failed: {}", e));
            }
        }
    }

    /// Replace the filters and refresh the list they apply to.
    ///
    /// With an active query the search is re-run; otherwise the view
    /// switches to discover.
    pub async fn apply_filters(&self, filters: FilterState) {
        INTENTS_HANDLED.with_label_values(&["filter"]).inc();

        let (ticket, request) = {
            let mut state = self.state.write().await;
            state.filters = filters;
            state.mode = if state.query.is_empty() {
                ViewMode::Discover
            } else {
                ViewMode::Search
            };
            self.begin_main(&state)
        };

        match request.mode {
            ViewMode::Search => self.fetch_search(ticket, request).await,
            _ => self.fetch_discover(ticket, request).await,
        }
    }

    /// Reset query and filters and show discover results again.
    pub async fn clear_all(&self) {
        INTENTS_HANDLED.with_label_values(&["clear"]).inc();

        let (ticket, request) = {
            let mut state = self.state.write().await;
            state.query.clear();
            state.filters = FilterState::default();
            state.mode = ViewMode::Discover;
            self.begin_main(&state)
        };

        self.fetch_discover(ticket, request).await;
    }

    /// Flip a movie's favorite membership.
    ///
    /// The store is written first; memory only changes once the write
    /// succeeded. In favorites mode the list is redrawn right away.
    pub async fn toggle_favorite(&self, movie_id: u32) {
        INTENTS_HANDLED.with_label_values(&["toggle_favorite"]).inc();

        let outcome = {
            let mut state = self.state.write().await;
            match self.favorites.toggle(&state.favorites, movie_id) {
                Ok((next, is_favorite)) => {
                    state.favorites = next;
                    let refresh = (state.mode == ViewMode::Favorites)
                        .then(|| self.begin_favorites(&state));
                    Ok((is_favorite, refresh))
                }
                Err(e) => Err(e),
            }
        };

        match outcome {
            Ok((is_favorite, refresh)) => {
                debug!("Movie {} favorite: {}", movie_id, is_favorite);
                self.renderer.render_favorite(movie_id, is_favorite);
                if let Some((ticket, request, ids)) = refresh {
                    self.fetch_favorites(ticket, request, ids).await;
                }
            }
            Err(e) => {
                warn!("Failed to toggle favorite {}: {}", movie_id, e);
                self.renderer
                    .render_error(Section::Main, &format!("Failed to update favorites: {}", e));
            }
        }
    }

    /// Switch to the favorites view.
    pub async fn show_favorites(&self) {
        INTENTS_HANDLED.with_label_values(&["show_favorites"]).inc();

        let (ticket, request, ids) = {
            let mut state = self.state.write().await;
            state.mode = ViewMode::Favorites;
            self.begin_favorites(&state)
        };
        self.fetch_favorites(ticket, request, ids).await;
    }

    async fn fetch_favorites(&self, ticket: RequestTicket, request: ListRequest, ids: Vec<u32>) {
        if ids.is_empty() {
            self.render_main(&request, Vec::new()).await;
            return;
        }

        let result = try_join_all(ids.iter().map(|id| self.catalog.movie(*id))).await;
        if !self.accept(ticket) {
            return;
        }

        match result {
            Ok(movies) => {
                let sorted = sort_movies(&movies, request.filters.sort);
                self.render_main(&request, sorted).await
            }
            Err(e) => {
                warn!("Loading {} favorites failed: {}", ids.len(), e);
                self.renderer
                    .render_error(Section::Main, &format!("Failed to load favorites: {}", e));
            }
        }
    }

    /// Open the detail view for a movie, with its trailer if any.
    pub async fn show_movie(&self, movie_id: u32) {
        INTENTS_HANDLED.with_label_values(&["show_movie"]).inc();

        let ticket = self.sequencer.begin(Section::Detail);
        self.renderer.render_loading(Section::Detail);

        let result = futures::try_join!(
            self.catalog.movie(movie_id),
            self.catalog.videos(movie_id)
        );
        if !self.accept(ticket) {
            return;
        }

        match result {
            Ok((movie, videos)) => {
                let state = self.state.read().await;
                let detail = MovieDetail {
                    genres: movie.genre_names(&state.genres),
                    is_favorite: state.favorites.contains(movie.id),
                    trailer: select_trailer(&videos).cloned(),
                    movie,
                };
                drop(state);
                self.renderer.render_detail(&detail);
            }
            Err(e) => {
                warn!("Loading movie {} failed: {}", movie_id, e);
                self.renderer.render_error(
                    Section::Detail,
                    &format!("Failed to load movie details: {}", e),
                );
            }
        }
    }

    /// Start a main list request for the state as it is now.
    ///
    /// Called with the state lock held, so the ticket order matches the
    /// order of the state changes.
    fn begin_main(&self, state: &SessionState) -> (RequestTicket, ListRequest) {
        let ticket = self.sequencer.begin(Section::Main);
        self.renderer.render_loading(Section::Main);
        (ticket, state.list_request())
    }

    fn begin_favorites(&self, state: &SessionState) -> (RequestTicket, ListRequest, Vec<u32>) {
        let (ticket, request) = self.begin_main(state);
        (ticket, request, state.favorites.iter().collect())
    }

    async fn render_main(&self, request: &ListRequest, movies: Vec<Movie>) {
        let view = self.state.read().await.list_view_for(request, movies);
        self.renderer.render_list(&view);
    }

    /// Whether the response for `ticket` may still be rendered.
    fn accept(&self, ticket: RequestTicket) -> bool {
        if self.sequencer.is_current(ticket) {
            return true;
        }
        debug!("Dropping superseded {} response", ticket.section.as_str());
        STALE_RESPONSES_DROPPED
            .with_label_values(&[ticket.section.as_str()])
            .inc();
        false
    }
}
