use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Page sizes are positive and the default fits under the maximum
/// - Request timeout and index batch size are positive
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Search validation
    let search = &config.search;
    if search.page_size == 0 {
        return Err(ConfigError::ValidationError(
            "search.page_size must be at least 1".to_string(),
        ));
    }
    if search.max_page_size == 0 {
        return Err(ConfigError::ValidationError(
            "search.max_page_size must be at least 1".to_string(),
        ));
    }
    if search.page_size > search.max_page_size {
        return Err(ConfigError::ValidationError(format!(
            "search.page_size ({}) exceeds search.max_page_size ({})",
            search.page_size, search.max_page_size
        )));
    }
    if search.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "search.timeout_secs cannot be 0".to_string(),
        ));
    }

    // Source validation
    if config.sources.index.batch_size == 0 {
        return Err(ConfigError::ValidationError(
            "sources.index.batch_size must be at least 1".to_string(),
        ));
    }

    Ok(())
}
