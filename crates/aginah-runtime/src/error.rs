//! Runtime error types.

use aginah_core::ApiError;
use aginah_framework::{BoxError, DispatchError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
///
/// Only [`Config`](Self::Config) and [`AlreadyRunning`](Self::AlreadyRunning)
/// are returned to the caller. The others describe failures of a single
/// event's processing and are handed to the
/// [`ErrorReporter`](crate::hooks::ErrorReporter) instead.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// `run` was called while the runtime was already running.
    #[error("Runtime is already running")]
    AlreadyRunning,

    /// The platform reported a connection-level failure.
    #[error("Connection error: {0}")]
    Connection(#[from] ApiError),

    /// An event could not be dispatched.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A guild hook returned an error.
    #[error("Guild hook `{hook}` failed: {source}")]
    Hook {
        hook: &'static str,
        #[source]
        source: BoxError,
    },

    /// Processing an event panicked.
    #[error("Panic while processing {event}: {message}")]
    Panic {
        event: &'static str,
        message: String,
    },
}

impl RuntimeError {
    /// Creates a hook error.
    pub fn hook(hook: &'static str, source: BoxError) -> Self {
        Self::Hook { hook, source }
    }
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
