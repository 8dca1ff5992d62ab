//! Controller lifecycle integration tests.
//!
//! These tests drive the controller through user intents against a mock
//! catalog and a recording renderer:
//! start -> browse/search/filter -> favorites -> detail

use std::sync::Arc;
use std::time::Duration;

use moviedeck_core::{
    testing::{fixtures, CatalogCall, MockCatalog, RecordedRender, RecordingRenderer},
    CatalogError, Controller, FavoritesStore, FilterState, KeyValueStore, ListContent,
    MemoryKeyValueStore, Section, SortKey, ViewMode, FAVORITES_KEY,
};

/// Test helper wiring a controller to its mocks.
struct TestHarness {
    controller: Arc<Controller>,
    catalog: Arc<MockCatalog>,
    renderer: Arc<RecordingRenderer>,
    store: Arc<MemoryKeyValueStore>,
}

impl TestHarness {
    async fn new() -> Self {
        Self::with_store(Arc::new(MemoryKeyValueStore::new())).await
    }

    async fn with_store(store: Arc<MemoryKeyValueStore>) -> Self {
        let catalog = Arc::new(MockCatalog::new());
        catalog.set_genres(fixtures::genres()).await;
        let renderer = Arc::new(RecordingRenderer::new());

        let controller = Arc::new(Controller::new(
            Arc::clone(&catalog) as Arc<dyn moviedeck_core::MovieCatalog>,
            FavoritesStore::new(Arc::clone(&store) as Arc<dyn KeyValueStore>),
            Arc::clone(&renderer) as Arc<dyn moviedeck_core::Renderer>,
        ));

        Self {
            controller,
            catalog,
            renderer,
            store,
        }
    }

    fn stored_favorites(&self) -> Option<String> {
        self.store.get(FAVORITES_KEY).unwrap()
    }
}

fn movie(id: u32, title: &str, popularity: f64) -> moviedeck_core::Movie {
    let mut m = fixtures::movie(id, title);
    m.popularity = popularity;
    m
}

fn ids(content: &ListContent) -> Vec<u32> {
    match content {
        ListContent::Movies(cards) => cards.iter().map(|c| c.movie.id).collect(),
        ListContent::Empty(_) => Vec::new(),
    }
}

// ============================================================================
// Startup
// ============================================================================

#[tokio::test]
async fn test_start_renders_trending_and_discover() {
    let h = TestHarness::new().await;
    let mut action = fixtures::movie(1, "Heat");
    action.genre_ids = vec![28, 9999];
    h.catalog.set_trending(vec![action.clone()]).await;
    h.catalog.set_discover(fixtures::movies(3)).await;

    h.controller.start().await.unwrap();

    let trending = h.renderer.trending();
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0][0].genres, vec!["Action"]);

    let list = h.renderer.last_list().unwrap();
    assert_eq!(list.mode, ViewMode::Discover);
    assert_eq!(list.title, "Discover Movies");
    assert!(!list.has_active_filters);
    assert_eq!(ids(&list.content), vec![1, 2, 3]);

    assert_eq!(
        h.catalog.calls().await,
        vec![
            CatalogCall::Genres,
            CatalogCall::Trending,
            CatalogCall::Discover(FilterState::default()),
        ]
    );
    assert_eq!(h.controller.genres().await.len(), 4);
}

#[tokio::test]
async fn test_start_fails_when_genres_fail() {
    let h = TestHarness::new().await;
    h.catalog.fail("genres", CatalogError::Timeout).await;

    let result = h.controller.start().await;
    assert!(result.is_err());

    let fatals = h.renderer.fatals();
    assert_eq!(fatals.len(), 1);
    assert!(fatals[0].starts_with("Failed to initialize app."));
    assert_eq!(h.catalog.calls().await, vec![CatalogCall::Genres]);
    assert!(h.renderer.lists().is_empty());
}

#[tokio::test]
async fn test_trending_failure_does_not_block_discover() {
    let h = TestHarness::new().await;
    h.catalog
        .fail(
            "trending",
            CatalogError::RemoteApi {
                status: 401,
                message: "Invalid API key".to_string(),
            },
        )
        .await;
    h.catalog.set_discover(fixtures::movies(2)).await;

    h.controller.start().await.unwrap();

    assert_eq!(
        h.renderer.errors(),
        vec![(
            Section::Trending,
            "Failed to load trending movies: Invalid API key".to_string()
        )]
    );
    assert_eq!(ids(&h.renderer.last_list().unwrap().content), vec![1, 2]);
}

#[tokio::test]
async fn test_discover_failure_does_not_block_trending() {
    let h = TestHarness::new().await;
    h.catalog.set_trending(fixtures::movies(2)).await;
    h.catalog
        .fail("discover", CatalogError::Network("connection reset".to_string()))
        .await;

    h.controller.start().await.unwrap();

    assert_eq!(h.renderer.trending().len(), 1);
    assert!(h.renderer.lists().is_empty());
    assert!(h.renderer.fatals().is_empty());

    let errors = h.renderer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, Section::Main);
    assert!(errors[0].1.starts_with("Failed to load movies: "));
}

#[tokio::test]
async fn test_start_loads_persisted_favorites() {
    let store = Arc::new(MemoryKeyValueStore::new());
    store.set(FAVORITES_KEY, r#"["2", "bogus", 3]"#).unwrap();
    let h = TestHarness::with_store(store).await;
    h.catalog.set_discover(fixtures::movies(3)).await;

    h.controller.start().await.unwrap();

    let snapshot = h.controller.snapshot().await;
    assert_eq!(snapshot.favorites.iter().collect::<Vec<_>>(), vec![2, 3]);

    let list = h.renderer.last_list().unwrap();
    let flags: Vec<bool> = list.movies().iter().map(|c| c.is_favorite).collect();
    assert_eq!(flags, vec![false, true, true]);
}

// ============================================================================
// Search and filters
// ============================================================================

#[tokio::test]
async fn test_search_sorts_client_side_and_passes_year() {
    let h = TestHarness::new().await;
    h.catalog
        .set_search(
            "alien",
            vec![movie(1, "Alien", 10.0), movie(2, "Aliens", 50.0), movie(3, "Alien 3", 30.0)],
        )
        .await;

    h.controller
        .apply_filters(FilterState {
            genre: None,
            year: Some(1986),
            sort: Some(SortKey::PopularityDesc),
        })
        .await;
    h.controller.search("  alien ").await;

    let list = h.renderer.last_list().unwrap();
    assert_eq!(list.mode, ViewMode::Search);
    assert_eq!(list.title, "Results for \"alien\"");
    assert!(list.has_active_filters);
    assert_eq!(ids(&list.content), vec![2, 3, 1]);

    let calls = h.catalog.calls().await;
    assert_eq!(
        calls.last(),
        Some(&CatalogCall::Search {
            query: "alien".to_string(),
            year: Some(1986),
        })
    );
}

#[tokio::test]
async fn test_search_no_results_shows_empty_state() {
    let h = TestHarness::new().await;

    h.controller.search("zzzz").await;

    let list = h.renderer.last_list().unwrap();
    assert_eq!(
        list.content,
        ListContent::Empty("No movies found for \"zzzz\".".to_string())
    );
}

#[tokio::test]
async fn test_empty_search_clears_everything() {
    let h = TestHarness::new().await;
    h.controller.search("matrix").await;
    h.controller
        .apply_filters(FilterState::from_inputs("28", "1999", "title.asc"))
        .await;
    h.catalog.clear_calls().await;

    h.controller.search("   ").await;

    let snapshot = h.controller.snapshot().await;
    assert_eq!(snapshot.mode, ViewMode::Discover);
    assert!(snapshot.query.is_empty());
    assert_eq!(snapshot.filters, FilterState::default());
    assert!(!snapshot.has_active_filters);
    assert_eq!(
        h.catalog.calls().await,
        vec![CatalogCall::Discover(FilterState::default())]
    );
    assert_eq!(h.renderer.last_list().unwrap().title, "Discover Movies");
}

#[tokio::test]
async fn test_clear_all_after_search_refetches_discover() {
    let h = TestHarness::new().await;
    h.catalog.set_discover(fixtures::movies(2)).await;
    h.controller.search("x").await;
    h.catalog.clear_calls().await;

    h.controller.clear_all().await;

    assert_eq!(
        h.catalog.calls().await,
        vec![CatalogCall::Discover(FilterState::default())]
    );
    let snapshot = h.controller.snapshot().await;
    assert_eq!(snapshot.mode, ViewMode::Discover);
    assert!(snapshot.query.is_empty());

    let list = h.renderer.last_list().unwrap();
    assert_eq!(list.mode, ViewMode::Discover);
    assert_eq!(list.title, "Discover Movies");
    assert_eq!(ids(&list.content), vec![1, 2]);
}

#[tokio::test]
async fn test_filters_without_query_use_discover() {
    let h = TestHarness::new().await;
    h.catalog.set_discover(fixtures::movies(2)).await;
    let filters = FilterState::from_inputs("35", "2001", "vote_average.desc");

    h.controller.apply_filters(filters).await;

    assert_eq!(
        h.catalog.calls().await,
        vec![CatalogCall::Discover(filters)]
    );
    let list = h.renderer.last_list().unwrap();
    assert_eq!(list.title, "Filtered Results");
    assert!(list.has_active_filters);
}

#[tokio::test]
async fn test_filters_with_query_rerun_search() {
    let h = TestHarness::new().await;
    h.catalog
        .set_search("heat", vec![movie(1, "b", 1.0), movie(2, "a", 2.0)])
        .await;
    h.controller.search("heat").await;
    h.catalog.clear_calls().await;

    h.controller
        .apply_filters(FilterState::from_inputs("", "1995", "title.asc"))
        .await;

    assert_eq!(
        h.catalog.calls().await,
        vec![CatalogCall::Search {
            query: "heat".to_string(),
            year: Some(1995),
        }]
    );
    let list = h.renderer.last_list().unwrap();
    assert_eq!(list.mode, ViewMode::Search);
    assert_eq!(ids(&list.content), vec![2, 1]);
}

#[tokio::test]
async fn test_search_failure_is_scoped_to_main() {
    let h = TestHarness::new().await;
    h.catalog
        .fail("search", CatalogError::Network("connection refused".to_string()))
        .await;

    h.controller.search("anything").await;

    let errors = h.renderer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, Section::Main);
    assert!(errors[0].1.starts_with("Search failed: "));
}

#[tokio::test]
async fn test_superseded_search_is_not_rendered() {
    let h = TestHarness::new().await;
    h.catalog.set_search("slow", fixtures::movies(1)).await;
    h.catalog.set_search("fast", fixtures::movies(2)).await;
    h.catalog
        .delay_search("slow", Duration::from_millis(200))
        .await;

    let controller = Arc::clone(&h.controller);
    let slow = tokio::spawn(async move { controller.search("slow").await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    h.controller.search("fast").await;
    slow.await.unwrap();

    let lists = h.renderer.lists();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].title, "Results for \"fast\"");
    assert_eq!(ids(&lists[0].content), vec![1, 2]);
}

#[tokio::test]
async fn test_switching_to_favorites_mid_search_keeps_views_consistent() {
    let h = TestHarness::new().await;
    h.catalog.set_search("slow", fixtures::movies(3)).await;
    h.catalog
        .delay_search("slow", Duration::from_millis(100))
        .await;

    let controller = Arc::clone(&h.controller);
    let search = tokio::spawn(async move { controller.search("slow").await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    h.controller.show_favorites().await;
    search.await.unwrap();

    for list in h.renderer.lists() {
        match list.mode {
            ViewMode::Favorites => assert_eq!(list.title, "My Favorites"),
            ViewMode::Search => assert_eq!(list.title, "Results for \"slow\""),
            ViewMode::Discover => panic!("unexpected discover list"),
        }
    }
    let last = h.renderer.last_list().unwrap();
    assert_eq!(last.mode, ViewMode::Favorites);
    assert!(matches!(last.content, ListContent::Empty(_)));
}

// ============================================================================
// Favorites
// ============================================================================

#[tokio::test]
async fn test_toggle_favorite_persists_and_renders() {
    let h = TestHarness::new().await;

    h.controller.toggle_favorite(42).await;
    assert_eq!(h.stored_favorites().as_deref(), Some(r#"["42"]"#));
    assert!(h.controller.snapshot().await.favorites.contains(42));

    h.controller.toggle_favorite(42).await;
    assert_eq!(h.stored_favorites().as_deref(), Some("[]"));
    assert!(!h.controller.snapshot().await.favorites.contains(42));

    let toggles: Vec<RecordedRender> = h
        .renderer
        .events()
        .into_iter()
        .filter(|e| matches!(e, RecordedRender::Favorite { .. }))
        .collect();
    assert_eq!(
        toggles,
        vec![
            RecordedRender::Favorite {
                movie_id: 42,
                is_favorite: true
            },
            RecordedRender::Favorite {
                movie_id: 42,
                is_favorite: false
            },
        ]
    );
}

#[tokio::test]
async fn test_toggle_favorite_write_failure_keeps_state() {
    let h = TestHarness::with_store(Arc::new(MemoryKeyValueStore::with_quota(4))).await;

    h.controller.toggle_favorite(7).await;

    assert!(!h.controller.snapshot().await.favorites.contains(7));
    let errors = h.renderer.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].1.starts_with("Failed to update favorites: "));
    assert!(h
        .renderer
        .events()
        .iter()
        .all(|e| !matches!(e, RecordedRender::Favorite { .. })));
}

#[tokio::test]
async fn test_empty_favorites_view_skips_network() {
    let h = TestHarness::new().await;

    h.controller.show_favorites().await;

    let list = h.renderer.last_list().unwrap();
    assert_eq!(list.mode, ViewMode::Favorites);
    assert_eq!(list.title, "My Favorites");
    assert!(matches!(list.content, ListContent::Empty(_)));
    assert!(h.catalog.calls().await.is_empty());
}

#[tokio::test]
async fn test_favorites_view_fetches_every_movie() {
    let h = TestHarness::new().await;
    for (id, title) in [(3, "Charlie"), (1, "alpha"), (2, "Bravo")] {
        h.catalog.add_movie(fixtures::movie(id, title)).await;
        h.controller.toggle_favorite(id).await;
    }
    h.controller
        .apply_filters(FilterState::from_inputs("", "", "title.asc"))
        .await;
    h.catalog.clear_calls().await;

    h.controller.show_favorites().await;

    let mut calls = h.catalog.calls().await;
    calls.sort_by_key(|c| format!("{:?}", c));
    assert_eq!(
        calls,
        vec![CatalogCall::Movie(1), CatalogCall::Movie(2), CatalogCall::Movie(3)]
    );

    let list = h.renderer.last_list().unwrap();
    assert_eq!(ids(&list.content), vec![1, 2, 3]);
    assert!(list.movies().iter().all(|c| c.is_favorite));
}

#[tokio::test]
async fn test_favorites_view_fails_as_a_whole() {
    let h = TestHarness::new().await;
    h.catalog.add_movie(fixtures::movie(1, "One")).await;
    h.controller.toggle_favorite(1).await;
    h.controller.toggle_favorite(2).await;
    h.catalog.fail_movie(2, CatalogError::Timeout).await;

    h.controller.show_favorites().await;

    assert!(h.renderer.lists().is_empty());
    assert_eq!(
        h.renderer.errors(),
        vec![(
            Section::Main,
            "Failed to load favorites: Request timed out".to_string()
        )]
    );
}

#[tokio::test]
async fn test_unfavorite_in_favorites_view_refreshes_list() {
    let h = TestHarness::new().await;
    h.catalog.add_movie(fixtures::movie(1, "One")).await;
    h.catalog.add_movie(fixtures::movie(2, "Two")).await;
    h.controller.toggle_favorite(1).await;
    h.controller.toggle_favorite(2).await;
    h.controller.show_favorites().await;

    h.controller.toggle_favorite(1).await;

    let list = h.renderer.last_list().unwrap();
    assert_eq!(list.mode, ViewMode::Favorites);
    assert_eq!(ids(&list.content), vec![2]);
}

// ============================================================================
// Detail
// ============================================================================

#[tokio::test]
async fn test_show_movie_selects_official_trailer() {
    let h = TestHarness::new().await;
    let mut heat = fixtures::movie(949, "Heat");
    heat.genres = vec![moviedeck_core::Genre {
        id: 80,
        name: "Crime".to_string(),
    }];
    h.catalog.add_movie(heat).await;
    h.catalog
        .set_videos(
            949,
            vec![
                fixtures::trailer("fan", false),
                fixtures::trailer("official", true),
            ],
        )
        .await;
    h.controller.toggle_favorite(949).await;

    h.controller.show_movie(949).await;

    let details = h.renderer.details();
    assert_eq!(details.len(), 1);
    let detail = &details[0];
    assert_eq!(detail.movie.title, "Heat");
    assert_eq!(detail.genres, vec!["Crime"]);
    assert!(detail.is_favorite);
    assert_eq!(detail.trailer.as_ref().map(|v| v.key.as_str()), Some("official"));
}

#[tokio::test]
async fn test_show_movie_without_trailer() {
    let h = TestHarness::new().await;
    h.catalog.add_movie(fixtures::movie(5, "Quiet")).await;

    h.controller.show_movie(5).await;

    let details = h.renderer.details();
    assert_eq!(details.len(), 1);
    assert!(details[0].trailer.is_none());
}

#[tokio::test]
async fn test_show_movie_failure_is_scoped_to_detail() {
    let h = TestHarness::new().await;
    h.catalog.add_movie(fixtures::movie(5, "Quiet")).await;
    h.catalog.fail("videos", CatalogError::Timeout).await;

    h.controller.show_movie(5).await;

    assert!(h.renderer.details().is_empty());
    assert_eq!(
        h.renderer.errors(),
        vec![(
            Section::Detail,
            "Failed to load movie details: Request timed out".to_string()
        )]
    );
}
