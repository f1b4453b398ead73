//! # Aginah Core
//!
//! Platform-facing building blocks of the Aginah dispatcher.
//!
//! This crate has no dispatch logic of its own. It defines the vocabulary the
//! other layers share:
//!
//! - **Entity model**: users, members, roles, messages, reactions, voice states
//!   and guilds ([`model`])
//! - **Partial entities**: [`Partial<T>`] and the [`Resolvable`] fetch contract
//! - **Events**: the [`Event`] enumeration adapters emit
//! - **Platform**: the [`Platform`] trait, a black-box client that can fetch
//!   entities and send messages
//!
//! ```text
//! ┌─────────────┐  Event   ┌────────────┐     ┌───────────┐
//! │   Adapter   │─────────▶│ Dispatcher │────▶│  Command  │
//! │ (Platform)  │◀─────────│ (framework)│────▶│ Listeners │
//! └─────────────┘  fetch / └────────────┘     └───────────┘
//!                  send
//! ```

pub mod error;
pub mod event;
pub mod model;
pub mod partial;
pub mod platform;

pub use error::{ApiError, ApiResult, ResolveError, ResolveResult};
pub use event::{Event, EventKind, MessageCreate, ReactionUpdate, VoiceStateUpdate};
pub use model::{
    ChannelId, Guild, GuildId, Member, Message, MessageId, Reaction, Role, RoleId, User, UserId,
    VoiceState,
};
pub use partial::{MemberRef, MessageRef, Partial, ReactionRef, Resolvable};
pub use platform::{BoxedPlatform, Platform};

/// Prelude for common imports.
pub mod prelude {
    pub use super::event::*;
    pub use super::model::*;
    pub use super::partial::{Partial, Resolvable};
    pub use super::platform::{BoxedPlatform, Platform};
}
