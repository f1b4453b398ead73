//! The chat platform client, seen from the dispatcher.
//!
//! The connection itself (gateway, authentication with the configured token,
//! reconnects) lives in an adapter. The dispatcher only needs the fetch and
//! send operations below.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::model::{
    ChannelId, Guild, GuildId, Member, Message, MessageId, Reaction, User, UserId,
};
use crate::partial::ReactionRef;

/// An active connection to the chat platform.
///
/// # API Design
///
/// - `fetch_*`: complete a partial entity the platform only announced by id
/// - `send_*` / `reply`: outbound messages used for authorization and error
///   replies; handlers may use them too
///
/// Adapters should provide their richer platform APIs on the concrete type and
/// expose them to handlers by downcasting through their own services.
#[async_trait]
pub trait Platform: Send + Sync + 'static {
    /// Fetches a user by id.
    async fn fetch_user(&self, id: UserId) -> ApiResult<User>;

    /// Fetches a guild member.
    async fn fetch_member(&self, guild_id: GuildId, user_id: UserId) -> ApiResult<Member>;

    /// Fetches a message.
    async fn fetch_message(&self, channel_id: ChannelId, message_id: MessageId)
    -> ApiResult<Message>;

    /// Fetches the aggregated reaction for one emoji on a message.
    async fn fetch_reaction(&self, reference: &ReactionRef) -> ApiResult<Reaction>;

    /// Lists the guilds the bot is currently in.
    async fn guilds(&self) -> ApiResult<Vec<Guild>>;

    /// Sends a message to a channel.
    async fn send_message(&self, channel_id: ChannelId, content: &str) -> ApiResult<MessageId>;

    /// Sends a direct message to a user.
    async fn send_private(&self, user_id: UserId, content: &str) -> ApiResult<MessageId>;

    /// Replies to a message in its channel.
    ///
    /// The default implementation mentions the author in front of the content.
    async fn reply(&self, to: &Message, content: &str) -> ApiResult<MessageId> {
        let text = format!("<@{}>, {}", to.author_id, content);
        self.send_message(to.channel_id, &text).await
    }
}

/// A shared platform trait object.
pub type BoxedPlatform = Arc<dyn Platform>;
