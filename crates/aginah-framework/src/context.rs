//! Contexts handed to commands and listeners.
//!
//! Each context is built per event from fully-resolved entities, so handlers
//! never see a [`Partial`](aginah_core::Partial). Contexts are cheap to clone:
//! the fan-out hands the same one to every listener.
//!
//! - [`InvocationContext`]: a message, for commands and message listeners
//! - [`ReactionContext`]: a reaction added to or removed from a message
//! - [`VoiceStateContext`]: a member's voice state before and after a change

use std::fmt;
use std::sync::Arc;

use aginah_core::{
    ApiResult, BoxedPlatform, GuildId, Member, Message, MessageId, Platform, Reaction, User, UserId,
    VoiceState,
};

use crate::registry::HandlerRegistry;

// =============================================================================
// InvocationContext
// =============================================================================

struct InvocationInner {
    platform: BoxedPlatform,
    registry: Arc<HandlerRegistry>,
    message: Message,
    author: User,
    member: Option<Member>,
}

/// A resolved message together with its author and, in guilds, member.
#[derive(Clone)]
pub struct InvocationContext {
    inner: Arc<InvocationInner>,
}

impl InvocationContext {
    pub fn new(
        platform: BoxedPlatform,
        registry: Arc<HandlerRegistry>,
        message: Message,
        author: User,
        member: Option<Member>,
    ) -> Self {
        Self {
            inner: Arc::new(InvocationInner {
                platform,
                registry,
                message,
                author,
                member,
            }),
        }
    }

    /// Returns the platform the message arrived on.
    pub fn platform(&self) -> &dyn Platform {
        self.inner.platform.as_ref()
    }

    /// Returns a shared handle to the platform.
    pub fn platform_arc(&self) -> BoxedPlatform {
        self.inner.platform.clone()
    }

    /// Returns the sealed registry, e.g. for listing commands in help output.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.inner.registry
    }

    pub fn message(&self) -> &Message {
        &self.inner.message
    }

    pub fn content(&self) -> &str {
        &self.inner.message.content
    }

    pub fn author(&self) -> &User {
        &self.inner.author
    }

    /// Returns the author's guild membership; `None` in direct messages.
    pub fn member(&self) -> Option<&Member> {
        self.inner.member.as_ref()
    }

    /// Returns the guild the message was sent in; `None` in direct messages.
    pub fn guild_id(&self) -> Option<GuildId> {
        self.inner.message.guild_id
    }

    /// Replies to the message in its channel.
    pub async fn reply(&self, content: &str) -> ApiResult<MessageId> {
        self.inner.platform.reply(&self.inner.message, content).await
    }

    /// Sends a plain message to the message's channel.
    pub async fn send(&self, content: &str) -> ApiResult<MessageId> {
        self.inner
            .platform
            .send_message(self.inner.message.channel_id, content)
            .await
    }

    /// Sends a direct message to the author.
    pub async fn send_private(&self, content: &str) -> ApiResult<MessageId> {
        self.inner
            .platform
            .send_private(self.inner.author.id, content)
            .await
    }
}

impl fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationContext")
            .field("message", &self.inner.message)
            .field("author", &self.inner.author)
            .field("member", &self.inner.member)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// ReactionContext
// =============================================================================

struct ReactionInner {
    platform: BoxedPlatform,
    reaction: Reaction,
    message: Message,
    user_id: UserId,
    added: bool,
}

/// A resolved reaction and the message it belongs to.
#[derive(Clone)]
pub struct ReactionContext {
    inner: Arc<ReactionInner>,
}

impl ReactionContext {
    pub fn new(
        platform: BoxedPlatform,
        reaction: Reaction,
        message: Message,
        user_id: UserId,
        added: bool,
    ) -> Self {
        Self {
            inner: Arc::new(ReactionInner {
                platform,
                reaction,
                message,
                user_id,
                added,
            }),
        }
    }

    pub fn platform(&self) -> &dyn Platform {
        self.inner.platform.as_ref()
    }

    pub fn reaction(&self) -> &Reaction {
        &self.inner.reaction
    }

    pub fn message(&self) -> &Message {
        &self.inner.message
    }

    /// Returns the user who reacted.
    pub fn user_id(&self) -> UserId {
        self.inner.user_id
    }

    /// `true` for an added reaction, `false` for a removed one.
    pub fn added(&self) -> bool {
        self.inner.added
    }
}

impl fmt::Debug for ReactionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactionContext")
            .field("reaction", &self.inner.reaction)
            .field("message", &self.inner.message.id)
            .field("user_id", &self.inner.user_id)
            .field("added", &self.inner.added)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// VoiceStateContext
// =============================================================================

struct VoiceStateInner {
    platform: BoxedPlatform,
    old: VoiceState,
    old_member: Member,
    new: VoiceState,
    new_member: Member,
}

/// A voice-state change with both members resolved.
#[derive(Clone)]
pub struct VoiceStateContext {
    inner: Arc<VoiceStateInner>,
}

impl VoiceStateContext {
    pub fn new(
        platform: BoxedPlatform,
        old: VoiceState,
        old_member: Member,
        new: VoiceState,
        new_member: Member,
    ) -> Self {
        Self {
            inner: Arc::new(VoiceStateInner {
                platform,
                old,
                old_member,
                new,
                new_member,
            }),
        }
    }

    pub fn platform(&self) -> &dyn Platform {
        self.inner.platform.as_ref()
    }

    pub fn old(&self) -> &VoiceState {
        &self.inner.old
    }

    pub fn old_member(&self) -> &Member {
        &self.inner.old_member
    }

    pub fn new_state(&self) -> &VoiceState {
        &self.inner.new
    }

    pub fn new_member(&self) -> &Member {
        &self.inner.new_member
    }

    /// Returns `true` if the member joined a voice channel with this change.
    pub fn joined(&self) -> bool {
        self.inner.old.channel_id.is_none() && self.inner.new.channel_id.is_some()
    }

    /// Returns `true` if the member left voice entirely with this change.
    pub fn left(&self) -> bool {
        self.inner.old.channel_id.is_some() && self.inner.new.channel_id.is_none()
    }
}

impl fmt::Debug for VoiceStateContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceStateContext")
            .field("old", &self.inner.old)
            .field("new", &self.inner.new)
            .finish_non_exhaustive()
    }
}
