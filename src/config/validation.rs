//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use url::Url;

use super::Settings;
use crate::utils::errors::{CampusError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_store_config(&settings.store)?;
    validate_identity_config(&settings.identity)?;
    validate_logging_config(&settings.logging)?;
    Ok(())
}

/// Validate document store configuration
fn validate_store_config(config: &super::StoreConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(CampusError::Config(
            "Store base URL is required".to_string(),
        ));
    }

    Url::parse(&config.base_url)
        .map_err(|e| CampusError::Config(format!("Invalid store base URL: {}", e)))?;

    if config.timeout_seconds == 0 {
        return Err(CampusError::Config(
            "Store timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate identity provider configuration
fn validate_identity_config(config: &super::IdentityConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(CampusError::Config(
            "Identity base URL is required".to_string(),
        ));
    }

    Url::parse(&config.base_url)
        .map_err(|e| CampusError::Config(format!("Invalid identity base URL: {}", e)))?;

    if config.api_key.is_empty() {
        return Err(CampusError::Config(
            "Identity API key is required".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(CampusError::Config(
            "Identity timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CampusError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(CampusError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_invalid_without_api_key() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_valid_settings() {
        let mut settings = Settings::default();
        settings.identity.api_key = "test-key".to_string();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_rejects_bad_url_and_zero_timeout() {
        let mut settings = Settings::default();
        settings.identity.api_key = "test-key".to_string();
        settings.store.base_url = "not a url".to_string();
        assert!(validate_settings(&settings).is_err());

        let mut settings = Settings::default();
        settings.identity.api_key = "test-key".to_string();
        settings.store.timeout_seconds = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.identity.api_key = "test-key".to_string();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
