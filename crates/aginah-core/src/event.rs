//! Platform events consumed by the dispatcher.
//!
//! Adapters translate their callbacks into a single [`Event`] stream; the
//! runtime feeds that stream through one ingress function.

use crate::error::ApiError;
use crate::model::{Guild, Member, Message, Reaction, User, UserId, VoiceState};
use crate::partial::Partial;

/// Classification of events, used for logging and routing decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MessageReceived,
    VoiceStateChanged,
    ReactionAdded,
    ReactionRemoved,
    GuildJoined,
    GuildLeft,
    ConnectionError,
    ConnectionReady,
}

impl EventKind {
    /// Returns the event name used in logs and spans.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MessageReceived => "message_received",
            Self::VoiceStateChanged => "voice_state_changed",
            Self::ReactionAdded => "reaction_added",
            Self::ReactionRemoved => "reaction_removed",
            Self::GuildJoined => "guild_joined",
            Self::GuildLeft => "guild_left",
            Self::ConnectionError => "connection_error",
            Self::ConnectionReady => "connection_ready",
        }
    }

    /// Returns `true` for events that are dispatched to handlers (as opposed
    /// to lifecycle events owned by the runtime).
    pub fn is_dispatchable(self) -> bool {
        matches!(
            self,
            Self::MessageReceived
                | Self::VoiceStateChanged
                | Self::ReactionAdded
                | Self::ReactionRemoved
        )
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A new message, together with its possibly-partial author and member.
#[derive(Debug, Clone)]
pub struct MessageCreate {
    pub message: Partial<Message>,
    pub author: Partial<User>,
    /// Present for guild messages.
    pub member: Option<Partial<Member>>,
}

/// A reaction was added to or removed from a message.
#[derive(Debug, Clone)]
pub struct ReactionUpdate {
    pub reaction: Partial<Reaction>,
    /// The message the reaction belongs to.
    pub message: Partial<Message>,
    /// The user who reacted.
    pub user_id: UserId,
}

/// A member's voice state changed.
#[derive(Debug, Clone)]
pub struct VoiceStateUpdate {
    pub old: VoiceState,
    pub old_member: Partial<Member>,
    pub new: VoiceState,
    pub new_member: Partial<Member>,
}

/// Every platform event the dispatcher and runtime react to.
#[derive(Debug, Clone)]
pub enum Event {
    MessageReceived(MessageCreate),
    VoiceStateChanged(Box<VoiceStateUpdate>),
    ReactionAdded(ReactionUpdate),
    ReactionRemoved(ReactionUpdate),
    GuildJoined(Guild),
    GuildLeft(Guild),
    ConnectionError(ApiError),
    ConnectionReady,
}

impl Event {
    /// Returns the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MessageReceived(_) => EventKind::MessageReceived,
            Self::VoiceStateChanged(_) => EventKind::VoiceStateChanged,
            Self::ReactionAdded(_) => EventKind::ReactionAdded,
            Self::ReactionRemoved(_) => EventKind::ReactionRemoved,
            Self::GuildJoined(_) => EventKind::GuildJoined,
            Self::GuildLeft(_) => EventKind::GuildLeft,
            Self::ConnectionError(_) => EventKind::ConnectionError,
            Self::ConnectionReady => EventKind::ConnectionReady,
        }
    }

    /// Returns the event name used in logs and spans.
    pub fn event_name(&self) -> &'static str {
        self.kind().as_str()
    }
}
