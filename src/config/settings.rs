//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub store: StoreConfig,
    pub identity: IdentityConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Identity provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub max_files: u32,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub admin_panel: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("CAMPUS").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::CampusError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                base_url: "http://localhost:8085/v1".to_string(),
                timeout_seconds: 10,
            },
            identity: IdentityConfig {
                base_url: "http://localhost:9099/v1".to_string(),
                api_key: String::new(),
                timeout_seconds: 10,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/campus-events".to_string(),
                max_files: 5,
            },
            features: FeaturesConfig { admin_panel: true },
        }
    }
}
