//! Configuration module for the Aginah runtime.
//!
//! Layered figment-based loading (files, environment, programmatic
//! overrides) and validation of the bot configuration.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    AginahConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, RoleConfig, SpanEventConfig,
};
pub use validation::validate_config;
