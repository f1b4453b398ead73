//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
///
/// ```toml
/// command_prefix = "!"
/// token = "..."
/// dev_mode = false
///
/// [roles]
/// tiers = ["helper", "moderator"]
///
/// [logging]
/// level = "info"
/// format = "compact"
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AginahConfig {
    /// Prefix that marks a message as a command invocation.
    #[serde(alias = "commandPrefix")]
    pub command_prefix: String,

    /// Credential the platform adapter connects with.
    pub token: String,

    /// Development mode: verbose logging.
    #[serde(alias = "devMode")]
    pub dev_mode: bool,

    /// Role tiers for minimum-role commands.
    pub roles: RoleConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for AginahConfig {
    fn default() -> Self {
        Self {
            command_prefix: "!".to_string(),
            token: String::new(),
            dev_mode: false,
            roles: RoleConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl fmt::Debug for AginahConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AginahConfig")
            .field("command_prefix", &self.command_prefix)
            .field("token", &"<redacted>")
            .field("dev_mode", &self.dev_mode)
            .field("roles", &self.roles)
            .field("logging", &self.logging)
            .finish()
    }
}

impl AginahConfig {
    /// Returns the log level to use, raised to `debug` in dev mode.
    pub fn effective_log_level(&self) -> LogLevel {
        if self.dev_mode && self.logging.level > LogLevel::Debug {
            LogLevel::Debug
        } else {
            self.logging.level
        }
    }
}

// =============================================================================
// Roles
// =============================================================================

/// Role tier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleConfig {
    /// Role names from lowest to highest rank.
    pub tiers: Vec<String>,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            tiers: vec!["moderator".to_string()],
        }
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity, from most to least verbose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    #[cfg(feature = "json-log")]
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Requires `file_path`.
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEventConfig {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    pub file_path: Option<PathBuf>,
    /// Per-module levels, e.g. `aginah_framework = "debug"`.
    pub filters: HashMap<String, LogLevel>,
    pub span_events: SpanEventConfig,
    pub thread_ids: bool,
    /// Include file names and line numbers.
    pub file_location: bool,
}
