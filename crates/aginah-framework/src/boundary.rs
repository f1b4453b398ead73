//! Command execution as tower services.
//!
//! A command invocation runs through two services:
//!
//! - [`CommandPipeline`]: looks the command up, applies the
//!   [`AuthorizationPolicy`], delivers denial messages and runs the command
//! - [`ErrorBoundary`]: wraps any such service, catching both error results
//!   and panics. A failure is logged, answered with a generic apology reply
//!   and then swallowed, so the boundary itself never fails.
//!
//! ```rust,ignore
//! use tower::{Layer, ServiceExt};
//!
//! let service = ErrorBoundaryLayer::new().layer(CommandPipeline::new(policy, "!"));
//! let outcome = service.oneshot(CommandRequest::new(ctx, parsed)).await?;
//! ```

use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use tower::{BoxError, Service, ServiceExt};
use tower_layer::Layer;
use tracing::{debug, error, warn};

use crate::command::ParsedCommand;
use crate::context::InvocationContext;
use crate::handler::panic_message;
use crate::policy::{AuthorizationPolicy, Decision, Delivery, Denial};

/// The reply sent when a command fails.
pub const APOLOGY: &str = "Something broke. Maybe check your command?";

/// One command invocation.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub ctx: InvocationContext,
    pub command: ParsedCommand,
}

impl CommandRequest {
    pub fn new(ctx: InvocationContext, command: ParsedCommand) -> Self {
        Self { ctx, command }
    }
}

/// What became of a command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command ran to completion.
    Executed { command: String },
    /// The policy refused the invocation. The user was told why unless the
    /// message could not be delivered.
    Denied(Denial),
    /// The policy dropped the invocation silently.
    Dropped,
    /// The command failed or panicked; an apology was sent.
    Failed,
}

// ============================================================================
// CommandPipeline
// ============================================================================

/// Lookup, authorization and execution of a single command.
#[derive(Debug, Clone)]
pub struct CommandPipeline {
    policy: AuthorizationPolicy,
    prefix: Arc<str>,
}

impl CommandPipeline {
    pub fn new(policy: AuthorizationPolicy, prefix: impl Into<Arc<str>>) -> Self {
        Self {
            policy,
            prefix: prefix.into(),
        }
    }
}

async fn deliver(ctx: &InvocationContext, denial: Denial, prefix: &str) -> Result<(), BoxError> {
    let text = denial.message(prefix);
    match denial.delivery() {
        Delivery::Channel => ctx.send(&text).await?,
        Delivery::Reply => ctx.reply(&text).await?,
        Delivery::Private => ctx.send_private(&text).await?,
    };
    Ok(())
}

impl Service<CommandRequest> for CommandPipeline {
    type Response = CommandOutcome;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<CommandOutcome, BoxError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: CommandRequest) -> Self::Future {
        let policy = self.policy.clone();
        let prefix = self.prefix.clone();

        async move {
            let CommandRequest { ctx, command } = req;
            let found = ctx.registry().lookup(&command.name).cloned();

            match policy.authorize(ctx.author(), found.as_deref(), ctx.guild_id(), ctx.member()) {
                Decision::Drop => Ok(CommandOutcome::Dropped),
                Decision::Deny(denial) => {
                    debug!(command = %command.name, ?denial, "Command invocation denied");
                    if let Err(err) = deliver(&ctx, denial, &prefix).await {
                        warn!(
                            command = %command.name,
                            author = %ctx.author().id,
                            ?denial,
                            error = %err,
                            "Failed to deliver denial"
                        );
                    }
                    Ok(CommandOutcome::Denied(denial))
                }
                Decision::Execute(cmd) => {
                    debug!(command = cmd.name(), args = ?command.args, "Executing command");
                    cmd.execute(ctx.clone(), command.args).await?;
                    Ok(CommandOutcome::Executed {
                        command: cmd.name().to_string(),
                    })
                }
            }
        }
        .boxed()
    }
}

// ============================================================================
// ErrorBoundary
// ============================================================================

/// A tower [`Layer`] producing [`ErrorBoundary`] services.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorBoundaryLayer;

impl ErrorBoundaryLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for ErrorBoundaryLayer {
    type Service = ErrorBoundary<S>;

    fn layer(&self, inner: S) -> ErrorBoundary<S> {
        ErrorBoundary { inner }
    }
}

/// Turns every failure of the inner command service into an apology reply.
#[derive(Debug, Clone)]
pub struct ErrorBoundary<S> {
    inner: S,
}

impl<S> ErrorBoundary<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S> Service<CommandRequest> for ErrorBoundary<S>
where
    S: Service<CommandRequest, Response = CommandOutcome> + Clone + Send + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
{
    type Response = CommandOutcome;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<CommandOutcome, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: CommandRequest) -> Self::Future {
        let inner = self.inner.clone();
        let ctx = req.ctx.clone();
        let name = req.command.name.clone();

        async move {
            let failure = match AssertUnwindSafe(inner.oneshot(req)).catch_unwind().await {
                Ok(Ok(outcome)) => return Ok(outcome),
                Ok(Err(err)) => {
                    let err: BoxError = err.into();
                    err.to_string()
                }
                Err(panic) => format!("panicked: {}", panic_message(panic.as_ref())),
            };

            error!(
                command = %name,
                author = %ctx.author().id,
                channel = %ctx.message().channel_id,
                error = %failure,
                "Command failed"
            );
            if let Err(err) = ctx.reply(APOLOGY).await {
                warn!(error = %err, "Failed to deliver apology");
            }
            Ok(CommandOutcome::Failed)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, CommandCategory, parse_command};
    use crate::policy::TieredRoles;
    use crate::registry::{HandlerRegistry, RegistryBuilder};
    use crate::test_support::{RecordingPlatform, Sent, member, message, user};
    use aginah_core::{ChannelId, UserId};

    async fn fail(_ctx: InvocationContext, _args: Vec<String>) -> Result<(), BoxError> {
        Err("dice fell off the table".into())
    }

    async fn explode(_ctx: InvocationContext, _args: Vec<String>) {
        panic!("boom");
    }

    async fn ok(ctx: InvocationContext, _args: Vec<String>) -> Result<(), BoxError> {
        ctx.send("rolled 4").await?;
        Ok(())
    }

    fn service() -> ErrorBoundary<CommandPipeline> {
        ErrorBoundaryLayer::new().layer(CommandPipeline::new(
            AuthorizationPolicy::new(TieredRoles::default()),
            "!",
        ))
    }

    fn registry() -> Arc<HandlerRegistry> {
        let registry = RegistryBuilder::new()
            .register(
                CommandCategory::new("test")
                    .command(Command::new("ok", ok))
                    .command(Command::new("fail", fail))
                    .command(Command::new("explode", explode))
                    .command(Command::new("ban", ok).guild_only().admin_only()),
            )
            .build();
        Arc::new(registry)
    }

    fn request(platform: Arc<RecordingPlatform>, content: &str) -> CommandRequest {
        let ctx = InvocationContext::new(
            platform,
            registry(),
            message(1, None, 1, content),
            user(1, "alice"),
            None,
        );
        CommandRequest::new(ctx, parse_command(content, "!").unwrap())
    }

    fn guild_request(platform: Arc<RecordingPlatform>, content: &str) -> CommandRequest {
        let author = user(1, "alice");
        let ctx = InvocationContext::new(
            platform,
            registry(),
            message(1, Some(1), 1, content),
            author.clone(),
            Some(member(author, 1, &[], false)),
        );
        CommandRequest::new(ctx, parse_command(content, "!").unwrap())
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let platform = RecordingPlatform::shared();
        let outcome = service()
            .oneshot(request(platform.clone(), "!ok"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Executed {
                command: "ok".into()
            }
        );
        assert_eq!(
            platform.sent(),
            vec![Sent::Channel(ChannelId(50), "rolled 4".into())]
        );
    }

    #[tokio::test]
    async fn test_error_becomes_single_apology() {
        let platform = RecordingPlatform::shared();
        let outcome = service()
            .oneshot(request(platform.clone(), "!fail"))
            .await
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Failed);
        assert_eq!(
            platform.sent(),
            vec![Sent::Channel(ChannelId(50), format!("<@1>, {APOLOGY}"))]
        );
    }

    #[tokio::test]
    async fn test_panic_becomes_single_apology() {
        let platform = RecordingPlatform::shared();
        let outcome = service()
            .oneshot(request(platform.clone(), "!explode"))
            .await
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Failed);
        assert_eq!(platform.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_command_is_denied_in_channel() {
        let platform = RecordingPlatform::shared();
        let outcome = service()
            .oneshot(request(platform.clone(), "!nope"))
            .await
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Denied(Denial::UnknownCommand));
        assert_eq!(
            platform.sent(),
            vec![Sent::Channel(
                ChannelId(50),
                "I don't know that command. Use `!help` for more info.".into()
            )]
        );
    }

    #[tokio::test]
    async fn test_denial_is_sent_privately() {
        let platform = RecordingPlatform::shared();
        let outcome = service()
            .oneshot(guild_request(platform.clone(), "!ban bob"))
            .await
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Denied(Denial::NoPermission));
        assert_eq!(
            platform.sent(),
            vec![Sent::Private(
                UserId(1),
                "You do not have permission to use that command.".into()
            )]
        );
    }

    #[tokio::test]
    async fn test_undeliverable_denial_is_still_a_denial() {
        let platform = RecordingPlatform::shared();
        platform.close_private_messages();
        let outcome = service()
            .oneshot(guild_request(platform.clone(), "!ban bob"))
            .await
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Denied(Denial::NoPermission));
        assert!(platform.sent().is_empty());
    }
}
