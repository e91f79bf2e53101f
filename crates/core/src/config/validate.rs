use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Transfer poll cadence and attempt budget are non-zero
/// - Collection service URL is non-empty when the section is present
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.transfer.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "transfer.poll_interval_ms cannot be 0".to_string(),
        ));
    }

    if config.transfer.max_poll_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "transfer.max_poll_attempts cannot be 0".to_string(),
        ));
    }

    if let Some(service) = &config.collection_service {
        if service.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "collection_service.url cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
