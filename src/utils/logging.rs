//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the campus-events services.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "campus-events.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log authentication events with structured data
pub fn log_auth_event(email: &str, action: &str, success: bool, details: Option<&str>) {
    if success {
        info!(
            email = email,
            action = action,
            details = details,
            "Authentication event: success"
        );
    } else {
        warn!(
            email = email,
            action = action,
            details = details,
            "Authentication event: failure"
        );
    }
}

/// Log admin actions against the data collections
pub fn log_admin_action(admin_uid: &str, action: &str, target: Option<&str>) {
    warn!(
        admin_uid = admin_uid,
        action = action,
        target = target,
        "Admin action performed"
    );
}
