//! Possibly-incomplete entities.
//!
//! The platform may announce an entity it has not cached, giving only the ids
//! needed to fetch it. Event payloads carry such entities as [`Partial<T>`];
//! the dispatcher resolves every partial before a handler sees it.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::model::{ChannelId, GuildId, Member, Message, MessageId, Reaction, User, UserId};
use crate::platform::Platform;

/// An entity that can be fetched from the platform by reference.
#[async_trait]
pub trait Resolvable: Sized + Send + Sync + 'static {
    /// The ids needed to fetch this entity.
    type Ref: Debug + Clone + Send + Sync;

    /// Human-readable entity kind used in errors and logs.
    const KIND: &'static str;

    /// Fetches the full entity.
    async fn fetch(platform: &dyn Platform, reference: &Self::Ref) -> ApiResult<Self>;
}

/// Either a fully-populated entity or a reference to fetch it by.
#[derive(Debug, Clone)]
pub enum Partial<T: Resolvable> {
    /// The platform delivered the complete entity.
    Full(T),
    /// Only the reference is known.
    Ref(T::Ref),
}

impl<T: Resolvable> Partial<T> {
    /// Returns `true` if the entity still needs to be fetched.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Ref(_))
    }

    /// Returns the full entity, if present.
    pub fn full(&self) -> Option<&T> {
        match self {
            Self::Full(value) => Some(value),
            Self::Ref(_) => None,
        }
    }
}

impl<T: Resolvable> From<T> for Partial<T> {
    fn from(value: T) -> Self {
        Self::Full(value)
    }
}

// ============================================================================
// References
// ============================================================================

/// Reference to a guild member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    pub guild_id: GuildId,
    pub user_id: UserId,
}

/// Reference to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

/// Reference to the reactions of one emoji on a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactionRef {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub emoji: String,
}

// ============================================================================
// Resolvable implementations
// ============================================================================

#[async_trait]
impl Resolvable for User {
    type Ref = UserId;
    const KIND: &'static str = "user";

    async fn fetch(platform: &dyn Platform, reference: &UserId) -> ApiResult<Self> {
        platform.fetch_user(*reference).await
    }
}

#[async_trait]
impl Resolvable for Member {
    type Ref = MemberRef;
    const KIND: &'static str = "member";

    async fn fetch(platform: &dyn Platform, reference: &MemberRef) -> ApiResult<Self> {
        platform
            .fetch_member(reference.guild_id, reference.user_id)
            .await
    }
}

#[async_trait]
impl Resolvable for Message {
    type Ref = MessageRef;
    const KIND: &'static str = "message";

    async fn fetch(platform: &dyn Platform, reference: &MessageRef) -> ApiResult<Self> {
        platform
            .fetch_message(reference.channel_id, reference.message_id)
            .await
    }
}

#[async_trait]
impl Resolvable for Reaction {
    type Ref = ReactionRef;
    const KIND: &'static str = "reaction";

    async fn fetch(platform: &dyn Platform, reference: &ReactionRef) -> ApiResult<Self> {
        platform.fetch_reaction(reference).await
    }
}

impl Message {
    /// Returns the reference that re-fetches this message.
    pub fn to_ref(&self) -> MessageRef {
        MessageRef {
            channel_id: self.channel_id,
            message_id: self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_is_not_partial() {
        let user = User {
            id: UserId(1),
            name: "a".into(),
            bot: false,
        };
        let partial: Partial<User> = user.clone().into();
        assert!(!partial.is_partial());
        assert_eq!(partial.full(), Some(&user));
    }

    #[test]
    fn test_ref_is_partial() {
        let partial: Partial<Member> = Partial::Ref(MemberRef {
            guild_id: GuildId(1),
            user_id: UserId(2),
        });
        assert!(partial.is_partial());
        assert!(partial.full().is_none());
    }
}
