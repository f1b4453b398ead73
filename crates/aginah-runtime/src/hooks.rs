//! Collaborators the runtime calls outside of handler dispatch.
//!
//! Guild-setup persistence and general error handling live outside the
//! dispatcher. The runtime only knows them through these two traits.

use std::fmt;

use aginah_core::{BoxedPlatform, Guild};
use aginah_framework::HandlerResult;
use async_trait::async_trait;
use tracing::error;

use crate::error::RuntimeError;

/// Reacts to guild membership changes and verifies guild setups on connect.
///
/// Every method defaults to doing nothing.
#[async_trait]
pub trait GuildHooks: Send + Sync + 'static {
    /// The bot was added to a guild.
    async fn on_guild_joined(&self, platform: &BoxedPlatform, guild: &Guild) -> HandlerResult {
        let _ = (platform, guild);
        Ok(())
    }

    /// The bot was removed from a guild.
    async fn on_guild_left(&self, platform: &BoxedPlatform, guild: &Guild) -> HandlerResult {
        let _ = (platform, guild);
        Ok(())
    }

    /// Runs once per connection before message, reaction and voice-state
    /// events are dispatched.
    async fn verify_guild_setups(&self, platform: &BoxedPlatform) -> HandlerResult {
        let _ = platform;
        Ok(())
    }
}

/// Guild hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGuildHooks;

impl GuildHooks for NoopGuildHooks {}

/// The general error handler.
///
/// Receives every failure that has no user to answer: connection errors,
/// unresolvable events, failing hooks and panics. Reporting must not fail.
pub trait ErrorReporter: Send + Sync + 'static {
    fn report(&self, error: &RuntimeError);
}

/// Reports errors as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, error: &RuntimeError) {
        error!(error = %error, "Unhandled error");
    }
}

impl<F> ErrorReporter for F
where
    F: Fn(&RuntimeError) + Send + Sync + 'static,
{
    fn report(&self, error: &RuntimeError) {
        self(error)
    }
}

impl fmt::Debug for dyn GuildHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GuildHooks")
    }
}

impl fmt::Debug for dyn ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorReporter")
    }
}
