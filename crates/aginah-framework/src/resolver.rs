//! Partial entity resolution.
//!
//! The platform may deliver events whose entities are only known by id.
//! [`PartialResolver`] fetches whatever is missing so that the dispatcher only
//! ever builds contexts from complete entities. Any failed fetch aborts the
//! dispatch of that event.

use aginah_core::{
    Member, Message, MessageCreate, Partial, Platform, Reaction, ReactionUpdate, ResolveError,
    ResolveResult, Resolvable, User, VoiceState, VoiceStateUpdate,
};
use tracing::trace;

/// A message event with every entity resolved.
#[derive(Debug, Clone)]
pub struct ResolvedMessage {
    pub message: Message,
    pub author: User,
    pub member: Option<Member>,
}

/// A reaction event with every entity resolved.
#[derive(Debug, Clone)]
pub struct ResolvedReaction {
    pub reaction: Reaction,
    pub message: Message,
}

/// A voice-state event with both members resolved.
#[derive(Debug, Clone)]
pub struct ResolvedVoiceState {
    pub old: VoiceState,
    pub old_member: Member,
    pub new: VoiceState,
    pub new_member: Member,
}

/// Turns partial entities into complete ones.
#[derive(Clone, Copy)]
pub struct PartialResolver<'a> {
    platform: &'a dyn Platform,
}

impl<'a> PartialResolver<'a> {
    pub fn new(platform: &'a dyn Platform) -> Self {
        Self { platform }
    }

    /// Returns the full entity, fetching it if only a reference is known.
    pub async fn resolve<T: Resolvable>(&self, partial: Partial<T>) -> ResolveResult<T> {
        match partial {
            Partial::Full(value) => Ok(value),
            Partial::Ref(reference) => {
                trace!(kind = T::KIND, reference = ?reference, "Fetching partial entity");
                T::fetch(self.platform, &reference)
                    .await
                    .map_err(|source| ResolveError {
                        kind: T::KIND,
                        reference: format!("{reference:?}"),
                        source,
                    })
            }
        }
    }

    /// Resolves the message, then its member (if any), then its author.
    pub async fn message(&self, event: MessageCreate) -> ResolveResult<ResolvedMessage> {
        let message = self.resolve(event.message).await?;
        let member = match event.member {
            Some(member) => Some(self.resolve(member).await?),
            None => None,
        };
        let author = self.resolve(event.author).await?;
        Ok(ResolvedMessage {
            message,
            author,
            member,
        })
    }

    /// Resolves the reaction, then the message it belongs to.
    pub async fn reaction(&self, event: ReactionUpdate) -> ResolveResult<ResolvedReaction> {
        let reaction = self.resolve(event.reaction).await?;
        let message = self.resolve(event.message).await?;
        Ok(ResolvedReaction { reaction, message })
    }

    /// Resolves the old member, then the new one.
    pub async fn voice_state(&self, event: VoiceStateUpdate) -> ResolveResult<ResolvedVoiceState> {
        let VoiceStateUpdate {
            old,
            old_member,
            new,
            new_member,
        } = event;
        let old_member = self.resolve(old_member).await?;
        let new_member = self.resolve(new_member).await?;
        Ok(ResolvedVoiceState {
            old,
            old_member,
            new,
            new_member,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingPlatform, message, user};
    use aginah_core::{ApiError, MemberRef, MessageRef, UserId};

    #[tokio::test]
    async fn test_full_entity_is_not_fetched() {
        let platform = RecordingPlatform::new();
        let resolver = PartialResolver::new(&platform);
        let alice = user(1, "alice");
        let resolved = resolver.resolve(Partial::Full(alice.clone())).await.unwrap();
        assert_eq!(resolved, alice);
        assert_eq!(platform.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_partial_entity_is_fetched() {
        let platform = RecordingPlatform::new();
        platform.add_user(user(1, "alice"));
        let resolver = PartialResolver::new(&platform);
        let resolved: User = resolver.resolve(Partial::Ref(UserId(1))).await.unwrap();
        assert_eq!(resolved.name, "alice");
        assert_eq!(platform.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_names_entity() {
        let platform = RecordingPlatform::new();
        let resolver = PartialResolver::new(&platform);
        let err = resolver
            .resolve::<Member>(Partial::Ref(MemberRef {
                guild_id: 5.into(),
                user_id: 6.into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.kind, "member");
        assert!(matches!(err.source, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_message_event_fetches_every_partial() {
        let platform = RecordingPlatform::new();
        let msg = message(7, Some(10), 1, "!roll");
        platform.add_message(msg.clone());
        platform.add_user(user(1, "alice"));
        let resolver = PartialResolver::new(&platform);

        let resolved = resolver
            .message(MessageCreate {
                message: Partial::Ref(msg.to_ref()),
                author: Partial::Ref(UserId(1)),
                member: None,
            })
            .await
            .unwrap();
        assert_eq!(resolved.message, msg);
        assert_eq!(resolved.author.name, "alice");
        assert!(resolved.member.is_none());
        assert_eq!(platform.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_message_event_aborts_on_missing_message() {
        let platform = RecordingPlatform::new();
        let resolver = PartialResolver::new(&platform);
        let result = resolver
            .message(MessageCreate {
                message: Partial::Ref(MessageRef {
                    channel_id: 1.into(),
                    message_id: 2.into(),
                }),
                author: Partial::Full(user(1, "alice")),
                member: None,
            })
            .await;
        assert!(result.is_err());
    }
}
