//! Platform entity model.
//!
//! These are the fully-populated shapes of the objects the chat platform
//! hands to the dispatcher. Adapters decode platform payloads into them; event
//! payloads wrap them in [`Partial`](crate::partial::Partial) when the platform
//! only knows an id.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw snowflake value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a user account.
    UserId
);
define_id!(
    /// Identifier of a guild (server).
    GuildId
);
define_id!(
    /// Identifier of a text or voice channel, including direct-message channels.
    ChannelId
);
define_id!(
    /// Identifier of a message.
    MessageId
);
define_id!(
    /// Identifier of a guild role.
    RoleId
);

// ============================================================================
// Entities
// ============================================================================

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Whether the account is a bot (including this bot itself).
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Returns the mention markup for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// A guild role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

/// A user's membership in a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
    pub guild_id: GuildId,
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Set when the platform grants this member the administrator permission.
    #[serde(default)]
    pub administrator: bool,
}

impl Member {
    /// Returns `true` if the member holds a role with the given name
    /// (case-insensitive).
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name.eq_ignore_ascii_case(name))
    }
}

/// A chat message.
///
/// The author and member are carried next to the message in
/// [`MessageCreate`](crate::event::MessageCreate) so each can be resolved on
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    /// `None` for direct messages.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    pub author_id: UserId,
    #[serde(default)]
    pub content: String,
}

/// A reaction on a message, aggregated per emoji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub emoji: String,
    #[serde(default)]
    pub count: u32,
}

/// A member's voice connection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceState {
    pub guild_id: GuildId,
    pub user_id: UserId,
    /// `None` when the member is not connected to a voice channel.
    #[serde(default)]
    pub channel_id: Option<ChannelId>,
    #[serde(default)]
    pub self_mute: bool,
    #[serde(default)]
    pub self_deaf: bool,
}

/// A guild the bot is a member of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: GuildId,
    pub name: String,
}
