//! In-memory platform double shared by the unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use aginah_core::{
    ApiError, ApiResult, ChannelId, Guild, GuildId, Member, Message, MessageId, Platform, Reaction,
    ReactionRef, Role, RoleId, User, UserId,
};
use async_trait::async_trait;
use parking_lot::Mutex;

/// An outbound message recorded by [`RecordingPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Channel(ChannelId, String),
    Private(UserId, String),
}

#[derive(Default)]
pub struct RecordingPlatform {
    users: Mutex<HashMap<UserId, User>>,
    members: Mutex<HashMap<(GuildId, UserId), Member>>,
    messages: Mutex<HashMap<(ChannelId, MessageId), Message>>,
    reactions: Mutex<HashMap<ReactionRef, Reaction>>,
    sent: Mutex<Vec<Sent>>,
    private_closed: AtomicBool,
    fetches: AtomicUsize,
    next_id: AtomicU64,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1000),
            ..Default::default()
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().insert(user.id, user);
    }

    pub fn add_member(&self, member: Member) {
        self.members
            .lock()
            .insert((member.guild_id, member.user.id), member);
    }

    pub fn add_message(&self, message: Message) {
        self.messages
            .lock()
            .insert((message.channel_id, message.id), message);
    }

    pub fn add_reaction(&self, reaction: Reaction) {
        let key = ReactionRef {
            channel_id: reaction.channel_id,
            message_id: reaction.message_id,
            emoji: reaction.emoji.clone(),
        };
        self.reactions.lock().insert(key, reaction);
    }

    /// Makes every following direct message fail, as if the user blocked them.
    pub fn close_private_messages(&self) {
        self.private_closed.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn record(&self, sent: Sent) -> MessageId {
        self.sent.lock().push(sent);
        MessageId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn fetched(&self) {
        self.fetches.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn fetch_user(&self, id: UserId) -> ApiResult<User> {
        self.fetched();
        self.users
            .lock()
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("user", id))
    }

    async fn fetch_member(&self, guild_id: GuildId, user_id: UserId) -> ApiResult<Member> {
        self.fetched();
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
        self.fetched();
        self.messages
            .lock()
            .get(&(channel_id, message_id))
            .cloned()
            .ok_or_else(|| ApiError::not_found("message", message_id))
    }

    async fn fetch_reaction(&self, reference: &ReactionRef) -> ApiResult<Reaction> {
        self.fetched();
        self.reactions
            .lock()
            .get(reference)
            .cloned()
            .ok_or_else(|| ApiError::not_found("reaction", &reference.emoji))
    }

    async fn guilds(&self) -> ApiResult<Vec<Guild>> {
        Ok(Vec::new())
    }

    async fn send_message(&self, channel_id: ChannelId, content: &str) -> ApiResult<MessageId> {
        Ok(self.record(Sent::Channel(channel_id, content.to_string())))
    }

    async fn send_private(&self, user_id: UserId, content: &str) -> ApiResult<MessageId> {
        if self.private_closed.load(Ordering::SeqCst) {
            return Err(ApiError::Forbidden("cannot send messages to this user".into()));
        }
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

pub fn bot(id: u64, name: &str) -> User {
    User {
        bot: true,
        ..user(id, name)
    }
}

pub fn member(user: User, guild_id: u64, roles: &[&str], administrator: bool) -> Member {
    Member {
        user,
        guild_id: GuildId(guild_id),
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

pub fn message(id: u64, guild_id: Option<u64>, author_id: u64, content: &str) -> Message {
    Message {
        id: MessageId(id),
        channel_id: ChannelId(50),
        guild_id: guild_id.map(GuildId),
        author_id: UserId(author_id),
        content: content.to_string(),
    }
}
