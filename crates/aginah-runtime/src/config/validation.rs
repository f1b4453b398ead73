//! Configuration validation utilities.

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::schema::{AginahConfig, LogOutput, LoggingConfig, RoleConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &AginahConfig) -> ConfigResult<()> {
    validate_prefix(&config.command_prefix)?;
    if config.token.trim().is_empty() {
        return Err(ConfigError::missing_field("token"));
    }
    validate_roles(&config.roles)?;
    validate_logging(&config.logging)?;
    Ok(())
}

/// Validates the command prefix.
fn validate_prefix(prefix: &str) -> ConfigResult<()> {
    if prefix.is_empty() {
        return Err(ConfigError::missing_field("command_prefix"));
    }
    if prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation(
            "Command prefix cannot contain whitespace",
        ));
    }
    Ok(())
}

/// Validates role tiers: names must be non-empty and unique, ignoring case.
fn validate_roles(roles: &RoleConfig) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for tier in &roles.tiers {
        if tier.trim().is_empty() {
            return Err(ConfigError::validation("Role tier names cannot be empty"));
        }
        if !seen.insert(tier.to_lowercase()) {
            return Err(ConfigError::validation(format!(
                "Duplicate role tier: {tier}"
            )));
        }
    }
    Ok(())
}

/// Validates logging settings.
fn validate_logging(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }
    Ok(())
}
