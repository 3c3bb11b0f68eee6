use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable prefix; nested keys use `__` (`MARQUEE_SEARCH__PAGE_SIZE`).
const ENV_PREFIX: &str = "MARQUEE_";

/// Conventional variable holding the OMDb key, honored for convenience.
const OMDB_KEY_VAR: &str = "OMDB_API_KEY";

/// Environment providers, lowest precedence first.
fn with_env(figment: Figment) -> Figment {
    figment
        .merge(
            Env::raw()
                .only(&[OMDB_KEY_VAR])
                .map(|_| "metadata.api_key".into()),
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    with_env(Figment::new().merge(Toml::file(path)))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from defaults and environment variables only
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    with_env(Figment::new())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
