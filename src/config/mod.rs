//! Configuration module

pub mod settings;
pub mod validation;

pub use settings::{
    FeaturesConfig, IdentityConfig, LoggingConfig, Settings, StoreConfig,
};
