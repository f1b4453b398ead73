//! Listeners for non-command events.
//!
//! A listener receives every event of its kind, in registration order, and
//! has no return contract beyond success or failure. Failures are logged by
//! the dispatcher and never reach the user or the other listeners.

use std::fmt;
use std::future::Future;

use crate::context::{InvocationContext, ReactionContext, VoiceStateContext};
use crate::handler::{HandlerFn, HandlerResult, IntoHandlerResult, into_handler_fn};

/// The kind of event a listener is registered for.
///
/// Reaction additions and removals share one kind; the context tells them
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Message,
    Reaction,
    VoiceState,
}

impl ListenerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Reaction => "reaction",
            Self::VoiceState => "voice_state",
        }
    }
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named listener over context type `C`.
pub struct Listener<C> {
    name: String,
    func: HandlerFn<C>,
}

/// Receives plain (non-command) messages.
pub type MessageListener = Listener<InvocationContext>;
/// Receives reaction additions and removals.
pub type ReactionListener = Listener<ReactionContext>;
/// Receives voice-state changes.
pub type VoiceStateListener = Listener<VoiceStateContext>;

impl<C: Send + 'static> Listener<C> {
    /// Creates a listener. The name is only used in logs.
    pub fn new<F, Fut, R>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoHandlerResult,
    {
        Self {
            name: name.into(),
            func: into_handler_fn(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calls the listener.
    pub async fn call(&self, ctx: C) -> HandlerResult {
        (self.func)(ctx).await
    }
}

impl<C> Clone for Listener<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: self.func.clone(),
        }
    }
}

impl<C> fmt::Debug for Listener<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listener_call() {
        let listener: Listener<u32> = Listener::new("even", |n: u32| async move {
            if n % 2 == 0 {
                Ok(())
            } else {
                Err("odd")
            }
        });
        assert_eq!(listener.name(), "even");
        assert!(listener.call(2).await.is_ok());
        assert!(listener.call(3).await.is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ListenerKind::Message.to_string(), "message");
        assert_eq!(ListenerKind::VoiceState.as_str(), "voice_state");
    }
}
