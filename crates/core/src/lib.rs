pub mod cache;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod favorites;
pub mod metrics;
pub mod storage;
pub mod testing;

pub use cache::{CacheEntry, CacheError, CacheStore, Clock, SystemClock};
pub use catalog::{
    CacheTtlConfig, CatalogClient, CatalogConfig, CatalogError, FilterState, Genre, GenreIndex,
    HttpTransport, Movie, MovieCatalog, ReqwestTransport, SortKey, Video,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    StorageConfig, UiConfig,
};
pub use controller::{
    Controller, InitializationError, ListContent, ListView, MovieCard, MovieDetail, Renderer,
    Section, SessionSnapshot, ViewMode,
};
pub use favorites::{FavoritesError, FavoritesSet, FavoritesStore, FAVORITES_KEY};
pub use storage::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError};
