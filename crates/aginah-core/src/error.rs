//! Unified error types for the Aginah core.
//!
//! Framework-level errors (dispatch failures) are defined in
//! `aginah-framework`; configuration and runtime errors in `aginah-runtime`.

use thiserror::Error;

// =============================================================================
// API Errors
// =============================================================================

/// Error returned by [`Platform`](crate::platform::Platform) calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The platform connection is not available.
    #[error("platform is not connected")]
    NotConnected,

    /// The requested entity does not exist (deleted, or never existed).
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"message"`.
        kind: &'static str,
        /// Display form of the reference that was looked up.
        id: String,
    },

    /// The platform refused the request.
    #[error("missing access: {0}")]
    Forbidden(String),

    /// The platform rate-limited the request.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited {
        /// Suggested back-off in milliseconds.
        retry_after_ms: u64,
    },

    /// Failed to deliver or decode a request.
    #[error("transport error: {0}")]
    Transport(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Creates a not-found error.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Resolve Errors
// =============================================================================

/// A partial entity could not be fetched.
///
/// Aborts dispatch of the event that carried the partial.
#[derive(Debug, Clone, Error)]
#[error("failed to resolve partial {kind} {reference}: {source}")]
pub struct ResolveError {
    /// Entity kind, e.g. `"member"`.
    pub kind: &'static str,
    /// Debug form of the reference that failed to resolve.
    pub reference: String,
    /// The underlying platform failure.
    #[source]
    pub source: ApiError,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for platform calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for partial resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;
