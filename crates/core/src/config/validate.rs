use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Catalog API key is set and base URL is http(s)
/// - Timeouts, trending limit and page range are positive
/// - Storage quota, when set, is positive
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let catalog = &config.catalog;

    if catalog.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.api_key cannot be empty".to_string(),
        ));
    }

    if !(catalog.base_url.starts_with("http://") || catalog.base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "catalog.base_url must be an http(s) URL, got {}",
            catalog.base_url
        )));
    }

    if catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.timeout_secs cannot be 0".to_string(),
        ));
    }

    if catalog.trending_limit == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.trending_limit cannot be 0".to_string(),
        ));
    }

    if catalog.random_page_max == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.random_page_max cannot be 0".to_string(),
        ));
    }

    if config.storage.quota_bytes == Some(0) {
        return Err(ConfigError::ValidationError(
            "storage.quota_bytes cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CacheTtlConfig, CatalogConfig};
    use crate::config::{StorageConfig, UiConfig};

    fn config() -> Config {
        Config {
            catalog: CatalogConfig::new("key"),
            cache: CacheTtlConfig::default(),
            storage: StorageConfig::default(),
            ui: UiConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&config()).is_ok());
    }

    #[test]
    fn test_validate_empty_api_key_fails() {
        let mut config = config();
        config.catalog.api_key = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_bad_base_url_fails() {
        let mut config = config();
        config.catalog.base_url = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_values_fail() {
        let mut c = config();
        c.catalog.timeout_secs = 0;
        assert!(validate_config(&c).is_err());

        let mut c = config();
        c.catalog.random_page_max = 0;
        assert!(validate_config(&c).is_err());

        let mut c = config();
        c.storage.quota_bytes = Some(0);
        assert!(validate_config(&c).is_err());

        let mut c = config();
        c.storage.quota_bytes = None;
        assert!(validate_config(&c).is_ok());
    }
}
