//! Shared fixtures for the scenario tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use aginah::core::{
    ApiError, ApiResult, ChannelId, Guild, GuildId, Member, MemberRef, Message, MessageCreate,
    MessageId, MessageRef, Partial, Platform, Reaction, ReactionRef, Role, RoleId, User, UserId,
};
use aginah::prelude::Event;
use async_trait::async_trait;
use parking_lot::Mutex;

pub const CHANNEL: ChannelId = ChannelId(50);
pub const GUILD: GuildId = GuildId(1);

/// An outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Channel(ChannelId, String),
    Private(UserId, String),
}

/// In-memory platform that records everything sent through it.
#[derive(Default)]
pub struct MockPlatform {
    users: Mutex<HashMap<UserId, User>>,
    members: Mutex<HashMap<(GuildId, UserId), Member>>,
    messages: Mutex<HashMap<(ChannelId, MessageId), Message>>,
    guilds: Mutex<Vec<Guild>>,
    sent: Mutex<Vec<Sent>>,
    message_fetches: AtomicUsize,
    next_id: AtomicU64,
}

impl MockPlatform {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().insert(user.id, user);
    }

    pub fn add_member(&self, member: Member) {
        self.add_user(member.user.clone());
        self.members
            .lock()
            .insert((member.guild_id, member.user.id), member);
    }

    pub fn add_message(&self, message: Message) {
        self.messages
            .lock()
            .insert((message.channel_id, message.id), message);
    }

    pub fn add_guild(&self, guild: Guild) {
        self.guilds.lock().push(guild);
    }

    pub fn message_fetches(&self) -> usize {
        self.message_fetches.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    fn record(&self, sent: Sent) -> MessageId {
        self.sent.lock().push(sent);
        MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1000)
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn fetch_user(&self, id: UserId) -> ApiResult<User> {
        self.users
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("user", id))
    }

    async fn fetch_member(&self, guild_id: GuildId, user_id: UserId) -> ApiResult<Member> {
        self.members
            .lock()
            .get(&(guild_id, user_id))
            .cloned()
            .ok_or_else(|| ApiError::not_found("member", user_id))
    }

    async fn fetch_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> ApiResult<Message> {
        self.message_fetches.fetch_add(1, Ordering::SeqCst);
        self.messages
            .lock()
            .get(&(channel_id, message_id))
            .cloned()
            .ok_or_else(|| ApiError::not_found("message", message_id))
    }

    async fn fetch_reaction(&self, reference: &ReactionRef) -> ApiResult<Reaction> {
        Err(ApiError::not_found("reaction", &reference.emoji))
    }

    async fn guilds(&self) -> ApiResult<Vec<Guild>> {
        Ok(self.guilds.lock().clone())
    }

    async fn send_message(&self, channel_id: ChannelId, content: &str) -> ApiResult<MessageId> {
        Ok(self.record(Sent::Channel(channel_id, content.to_string())))
    }

    async fn send_private(&self, user_id: UserId, content: &str) -> ApiResult<MessageId> {
        Ok(self.record(Sent::Private(user_id, content.to_string())))
    }
}

pub fn user(id: u64, name: &str) -> User {
    User {
        id: UserId(id),
        name: name.to_string(),
        bot: false,
    }
}

pub fn member(user: User, roles: &[&str], administrator: bool) -> Member {
    Member {
        user,
        guild_id: GUILD,
        roles: roles
            .iter()
            .enumerate()
            .map(|(i, name)| Role {
                id: RoleId(i as u64 + 1),
                name: (*name).to_string(),
            })
            .collect(),
        administrator,
    }
}

fn message(id: u64, guild_id: Option<GuildId>, author: &User, content: &str) -> Message {
    Message {
        id: MessageId(id),
        channel_id: CHANNEL,
        guild_id,
        author_id: author.id,
        content: content.to_string(),
    }
}

/// A direct message with every entity fully populated.
pub fn direct_message(author: &User, content: &str) -> Event {
    Event::MessageReceived(MessageCreate {
        message: Partial::Full(message(10, None, author, content)),
        author: Partial::Full(author.clone()),
        member: None,
    })
}

/// A guild message with every entity fully populated.
pub fn guild_message(member: &Member, content: &str) -> Event {
    Event::MessageReceived(MessageCreate {
        message: Partial::Full(message(11, Some(member.guild_id), &member.user, content)),
        author: Partial::Full(member.user.clone()),
        member: Some(Partial::Full(member.clone())),
    })
}

/// A guild message announced by ids only. The platform must know the
/// message and the member.
pub fn partial_guild_message(platform: &MockPlatform, member: &Member, content: &str) -> Event {
    let full = message(12, Some(member.guild_id), &member.user, content);
    platform.add_message(full.clone());
    platform.add_member(member.clone());
    Event::MessageReceived(MessageCreate {
        message: Partial::Ref(MessageRef {
            channel_id: full.channel_id,
            message_id: full.id,
        }),
        author: Partial::Ref(member.user.id),
        member: Some(Partial::Ref(MemberRef {
            guild_id: member.guild_id,
            user_id: member.user.id,
        })),
    })
}
