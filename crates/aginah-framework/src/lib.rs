//! # Aginah Framework
//!
//! The dispatch and authorization engine of the Aginah bot.
//!
//! This layer provides:
//! - [`Command`]s grouped into [`CommandCategory`]s, and listeners for plain
//!   messages, reactions and voice-state changes
//! - The [`HandlerRegistry`], built once through a [`RegistryBuilder`] and
//!   read-only afterwards
//! - [`parse_command`], splitting `<prefix><name> <args...>`
//! - The [`AuthorizationPolicy`] (guild-only, admin-only and minimum-role
//!   rules) over a pluggable [`RoleVerifier`]
//! - The [`PartialResolver`], completing partial entities before any handler
//!   sees them
//! - The [`Dispatcher`], routing events to the command pipeline or to listener
//!   fan-out, with every command wrapped in an [`ErrorBoundary`]
//!
//! The connection to the chat platform is not part of this crate; everything
//! here talks to it through [`aginah_core::Platform`].

pub mod boundary;
pub mod command;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod listener;
pub mod policy;
pub mod registry;
pub mod resolver;

#[cfg(test)]
mod test_support;

pub use boundary::{
    APOLOGY, CommandOutcome, CommandPipeline, CommandRequest, ErrorBoundary, ErrorBoundaryLayer,
};
pub use command::{Command, CommandCategory, CommandFn, ParsedCommand, parse_command};
pub use context::{InvocationContext, ReactionContext, VoiceStateContext};
pub use dispatcher::{DispatchOutcome, Dispatcher, FanOutReport};
pub use error::{DispatchError, DispatchResult};
pub use handler::{
    BoxError, BoxFuture, HandlerFn, HandlerResult, IntoHandlerResult, panic_message,
};
pub use listener::{
    Listener, ListenerKind, MessageListener, ReactionListener, VoiceStateListener,
};
pub use policy::{
    AuthorizationPolicy, Decision, Delivery, Denial, RoleTier, RoleVerifier, TieredRoles,
};
pub use registry::{HandlerRegistry, Registration, RegistryBuilder};
pub use resolver::{PartialResolver, ResolvedMessage, ResolvedReaction, ResolvedVoiceState};
