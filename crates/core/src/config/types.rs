use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::{CacheTtlConfig, CatalogConfig};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cache: CacheTtlConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Persistent storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Maximum bytes of keys and values (default: 5 MiB). Unset means unbounded.
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("moviedeck.db")
}

fn default_quota_bytes() -> Option<u64> {
    Some(5 * 1024 * 1024)
}

/// Front-end behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Delay before a typed search is sent (default: 300).
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

fn default_search_debounce_ms() -> u64 {
    300
}

/// Sanitized config for display (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub catalog: SanitizedCatalogConfig,
    pub cache: CacheTtlConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,
}

/// Sanitized catalog config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
    pub trending_limit: usize,
    pub random_page_max: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let catalog = &config.catalog;
        Self {
            catalog: SanitizedCatalogConfig {
                base_url: catalog.base_url.clone(),
                image_base_url: catalog.image_base_url.clone(),
                language: catalog.language.clone(),
                api_key_configured: !catalog.api_key.is_empty(),
                timeout_secs: catalog.timeout_secs,
                trending_limit: catalog.trending_limit,
                random_page_max: catalog.random_page_max,
            },
            cache: config.cache.clone(),
            storage: config.storage.clone(),
            ui: config.ui.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[catalog]
api_key = "abc"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.catalog.api_key, "abc");
        assert_eq!(config.catalog.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.catalog.trending_limit, 10);
        assert_eq!(config.catalog.random_page_max, 10);
        assert_eq!(config.cache.genres_hours, 24);
        assert_eq!(config.cache.trending_hours, 1);
        assert_eq!(config.storage.path.to_str().unwrap(), "moviedeck.db");
        assert_eq!(config.storage.quota_bytes, Some(5 * 1024 * 1024));
        assert_eq!(config.ui.search_debounce_ms, 300);
    }

    #[test]
    fn test_deserialize_missing_catalog_fails() {
        let toml = r#"
[storage]
path = "x.db"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[catalog]
api_key = "abc"
base_url = "http://localhost:9000/3"
language = "it-IT"
timeout_secs = 5

[cache]
trending_hours = 2

[storage]
path = "/data/moviedeck.sqlite"
quota_bytes = 1024

[ui]
search_debounce_ms = 150
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.catalog.base_url, "http://localhost:9000/3");
        assert_eq!(config.catalog.language, "it-IT");
        assert_eq!(config.catalog.timeout_secs, 5);
        assert_eq!(config.cache.trending_hours, 2);
        assert_eq!(config.cache.movie_hours, 24);
        assert_eq!(config.storage.quota_bytes, Some(1024));
        assert_eq!(config.ui.search_debounce_ms, 150);
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let config = Config {
            catalog: CatalogConfig::new("secret-key"),
            cache: CacheTtlConfig::default(),
            storage: StorageConfig::default(),
            ui: UiConfig::default(),
        };

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.catalog.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
    }
}
