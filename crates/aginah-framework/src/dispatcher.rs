//! Event dispatcher for the Aginah framework.
//!
//! The [`Dispatcher`] receives one platform [`Event`] at a time, resolves the
//! partial entities it carries and routes it:
//!
//! - **Messages** starting with the command prefix go through the command
//!   pipeline, wrapped in the [`ErrorBoundary`]. Every other message is fanned
//!   out to the message listeners.
//! - **Reactions** (added or removed) are fanned out to the reaction
//!   listeners.
//! - **Voice-state changes** are fanned out to the voice-state listeners.
//! - **Lifecycle events** (guild joined/left, connection ready/error) are not
//!   routed here; the runtime hands them to its hooks.
//!
//! Messages from bot accounts are ignored entirely.
//!
//! # Fan-out
//!
//! Listeners of one kind run sequentially, in registration order. Each one is
//! isolated: an error or a panic is logged and the next listener still runs.
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(registry, AuthorizationPolicy::default(), "!");
//! match dispatcher.dispatch(platform.clone(), event).await? {
//!     DispatchOutcome::Command(outcome) => debug!(?outcome, "command handled"),
//!     _ => {}
//! }
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tower::ServiceExt;
use tower_layer::Layer;
use tracing::{Instrument, debug_span, error, trace};

use aginah_core::{BoxedPlatform, Event, EventKind, MessageCreate, ReactionUpdate, VoiceStateUpdate};

use crate::boundary::{
    CommandOutcome, CommandPipeline, CommandRequest, ErrorBoundary, ErrorBoundaryLayer,
};
use crate::command::parse_command;
use crate::context::{InvocationContext, ReactionContext, VoiceStateContext};
use crate::error::DispatchResult;
use crate::handler::panic_message;
use crate::listener::{Listener, ListenerKind};
use crate::policy::AuthorizationPolicy;
use crate::registry::HandlerRegistry;
use crate::resolver::PartialResolver;

/// How many listeners a fan-out invoked, and how many of them failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    /// Listeners invoked, including failed ones.
    pub ran: usize,
    /// Listeners that returned an error or panicked.
    pub failed: usize,
}

/// What the dispatcher did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The message came from a bot account.
    Ignored,
    /// The event was fanned out to listeners.
    Listeners(FanOutReport),
    /// The message was handled as a command invocation.
    Command(CommandOutcome),
    /// The event belongs to the runtime, not to handlers.
    NotRoutable(EventKind),
}

/// Routes platform events to commands and listeners.
///
/// Cheap to clone; every clone shares the same sealed registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    commands: ErrorBoundary<CommandPipeline>,
    prefix: Arc<str>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<HandlerRegistry>,
        policy: AuthorizationPolicy,
        prefix: impl Into<Arc<str>>,
    ) -> Self {
        let prefix = prefix.into();
        let commands = ErrorBoundaryLayer::new().layer(CommandPipeline::new(policy, prefix.clone()));
        Self {
            registry,
            commands,
            prefix,
        }
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Dispatches a single event.
    ///
    /// Returns an error only when a partial entity could not be resolved, in
    /// which case no handler has run.
    pub async fn dispatch(
        &self,
        platform: BoxedPlatform,
        event: Event,
    ) -> DispatchResult<DispatchOutcome> {
        let span = debug_span!("dispatch", event_name = event.event_name());
        self.route(platform, event).instrument(span).await
    }

    async fn route(&self, platform: BoxedPlatform, event: Event) -> DispatchResult<DispatchOutcome> {
        match event {
            Event::MessageReceived(payload) => self.on_message(platform, payload).await,
            Event::VoiceStateChanged(payload) => self.on_voice_state(platform, *payload).await,
            Event::ReactionAdded(payload) => self.on_reaction(platform, payload, true).await,
            Event::ReactionRemoved(payload) => self.on_reaction(platform, payload, false).await,
            other => Ok(DispatchOutcome::NotRoutable(other.kind())),
        }
    }

    async fn on_message(
        &self,
        platform: BoxedPlatform,
        payload: MessageCreate,
    ) -> DispatchResult<DispatchOutcome> {
        let resolved = PartialResolver::new(platform.as_ref())
            .message(payload)
            .await?;
        if resolved.author.bot {
            trace!(author = %resolved.author.id, "Ignoring message from bot account");
            return Ok(DispatchOutcome::Ignored);
        }

        let ctx = InvocationContext::new(
            platform,
            self.registry.clone(),
            resolved.message,
            resolved.author,
            resolved.member,
        );

        let Some(parsed) = parse_command(ctx.content(), &self.prefix) else {
            let report = fan_out(ListenerKind::Message, self.registry.message_listeners(), ctx).await;
            return Ok(DispatchOutcome::Listeners(report));
        };

        let outcome = match self
            .commands
            .clone()
            .oneshot(CommandRequest::new(ctx, parsed))
            .await
        {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        };
        Ok(DispatchOutcome::Command(outcome))
    }

    async fn on_reaction(
        &self,
        platform: BoxedPlatform,
        payload: ReactionUpdate,
        added: bool,
    ) -> DispatchResult<DispatchOutcome> {
        let user_id = payload.user_id;
        let resolved = PartialResolver::new(platform.as_ref())
            .reaction(payload)
            .await?;
        let ctx = ReactionContext::new(platform, resolved.reaction, resolved.message, user_id, added);
        let report = fan_out(ListenerKind::Reaction, self.registry.reaction_listeners(), ctx).await;
        Ok(DispatchOutcome::Listeners(report))
    }

    async fn on_voice_state(
        &self,
        platform: BoxedPlatform,
        payload: VoiceStateUpdate,
    ) -> DispatchResult<DispatchOutcome> {
        let resolved = PartialResolver::new(platform.as_ref())
            .voice_state(payload)
            .await?;
        let ctx = VoiceStateContext::new(
            platform,
            resolved.old,
            resolved.old_member,
            resolved.new,
            resolved.new_member,
        );
        let report = fan_out(
            ListenerKind::VoiceState,
            self.registry.voice_state_listeners(),
            ctx,
        )
        .await;
        Ok(DispatchOutcome::Listeners(report))
    }
}

/// Runs every listener in order, isolating each one's failure.
async fn fan_out<C>(kind: ListenerKind, listeners: &[Listener<C>], ctx: C) -> FanOutReport
where
    C: Clone + Send + 'static,
{
    let mut report = FanOutReport::default();
    for listener in listeners {
        report.ran += 1;
        match AssertUnwindSafe(listener.call(ctx.clone()))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                report.failed += 1;
                error!(%kind, listener = listener.name(), error = %err, "Listener failed");
            }
            Err(panic) => {
                report.failed += 1;
                error!(
                    %kind,
                    listener = listener.name(),
                    panic = %panic_message(panic.as_ref()),
                    "Listener panicked"
                );
            }
        }
    }
    report
}
