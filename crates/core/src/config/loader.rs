use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
///
/// Overrides use the `MOVIEDECK_` prefix and `__` between section and key,
/// e.g. `MOVIEDECK_CATALOG__API_KEY`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("MOVIEDECK_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    resolve_env_refs(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    let config = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    resolve_env_refs(config)
}

/// Expand `${VAR}` secrets from the environment.
fn resolve_env_refs(mut config: Config) -> Result<Config, ConfigError> {
    config.catalog.api_key = expand_env(&config.catalog.api_key)?;
    Ok(config)
}

fn expand_env(value: &str) -> Result<String, ConfigError> {
    let Some(name) = value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Ok(value.to_string());
    };

    std::env::var(name).map_err(|_| {
        ConfigError::ParseError(format!("environment variable {} is not set", name))
    })
}
