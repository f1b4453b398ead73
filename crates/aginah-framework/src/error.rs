//! Error types for the Aginah framework.

use aginah_core::ResolveError;
use thiserror::Error;

/// Errors that abort the dispatch of a single event.
///
/// Authorization denials and failing handlers are not errors at this level:
/// the former are normal outcomes, the latter are absorbed by the error
/// boundary or the listener fan-out.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A partial entity in the event payload could not be fetched.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
