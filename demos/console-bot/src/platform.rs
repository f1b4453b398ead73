//! An in-memory chat platform driven by stdin.
//!
//! There is one guild with one text channel and one voice channel, and one
//! human member: whoever types into the console. Outbound messages are
//! printed. Input lines become platform events, announced by id only so the
//! dispatcher has to fetch them back like it would from a real server.

use std::collections::HashMap;

use aginah::core::{
    ApiError, ApiResult, ChannelId, Guild, GuildId, Member, MemberRef, Message, MessageCreate,
    MessageId, MessageRef, Partial, Platform, Reaction, ReactionRef, ReactionUpdate, Role, RoleId,
    User, UserId, VoiceState, VoiceStateUpdate,
};
use aginah::prelude::Event;
use async_trait::async_trait;
use parking_lot::Mutex;

const GUILD: GuildId = GuildId(1);
const TEXT_CHANNEL: ChannelId = ChannelId(10);
const VOICE_CHANNEL: ChannelId = ChannelId(11);
const DM_CHANNEL: ChannelId = ChannelId(20);
const YOU: UserId = UserId(2);

pub const CONSOLE_HELP: &str = "\
console commands:
  :dm <text>        send a direct message to the bot
  :admin            toggle your administrator permission
  :role <name>      toggle a role, e.g. `:role moderator`
  :react <emoji>    react to your last message
  :unreact <emoji>  remove that reaction
  :voice            join or leave the voice channel
  :quit             exit
anything else is posted in #general";

/// What one input line turned into.
pub enum Input {
    Event(Event),
    Console(String),
    Quit,
}

struct State {
    you: Member,
    messages: HashMap<MessageId, Message>,
    reactions: HashMap<ReactionRef, Reaction>,
    last_message: Option<MessageId>,
    voice: Option<ChannelId>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self) -> MessageId {
        self.next_id += 1;
        MessageId(self.next_id)
    }
}

pub struct ConsolePlatform {
    guild: Guild,
    state: Mutex<State>,
}

impl ConsolePlatform {
    pub fn new(name: &str) -> Self {
        let you = Member {
            user: User {
                id: YOU,
                name: name.to_string(),
                bot: false,
            },
            guild_id: GUILD,
            roles: Vec::new(),
            administrator: false,
        };
        Self {
            guild: Guild {
                id: GUILD,
                name: "console".into(),
            },
            state: Mutex::new(State {
                you,
                messages: HashMap::new(),
                reactions: HashMap::new(),
                last_message: None,
                voice: None,
                next_id: 100,
            }),
        }
    }

    pub fn guild(&self) -> Guild {
        self.guild.clone()
    }

    /// Turns one line of console input into an event.
    pub fn translate(&self, line: &str) -> Option<Input> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(command) = line.strip_prefix(':') else {
            return Some(Input::Event(self.post(Some(GUILD), TEXT_CHANNEL, line)));
        };

        let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
        let rest = rest.trim();
        let input = match name {
            "quit" | "q" => Input::Quit,
            "dm" => Input::Event(self.post(None, DM_CHANNEL, rest)),
            "admin" => {
                let mut state = self.state.lock();
                state.you.administrator = !state.you.administrator;
                Input::Console(format!("administrator: {}", state.you.administrator))
            }
            "role" if !rest.is_empty() => Input::Console(self.toggle_role(rest)),
            "react" | "unreact" if !rest.is_empty() => match self.react(rest, name == "react") {
                Some(event) => Input::Event(event),
                None => Input::Console("say something first".into()),
            },
            "voice" => Input::Event(self.toggle_voice()),
            _ => Input::Console(CONSOLE_HELP.into()),
        };
        Some(input)
    }

    fn post(&self, guild_id: Option<GuildId>, channel_id: ChannelId, content: &str) -> Event {
        let mut state = self.state.lock();
        let message = Message {
            id: state.next_id(),
            channel_id,
            guild_id,
            author_id: YOU,
            content: content.to_string(),
        };
        let reference = message.to_ref();
        state.last_message = Some(message.id);
        state.messages.insert(message.id, message);

        Event::MessageReceived(MessageCreate {
            message: Partial::Ref(reference),
            author: Partial::Ref(YOU),
            member: guild_id.map(|guild_id| {
                Partial::Ref(MemberRef {
                    guild_id,
                    user_id: YOU,
                })
            }),
        })
    }

    fn toggle_role(&self, name: &str) -> String {
        let mut state = self.state.lock();
        let roles = &mut state.you.roles;
        if let Some(pos) = roles.iter().position(|r| r.name.eq_ignore_ascii_case(name)) {
            roles.remove(pos);
        } else {
            let id = RoleId(roles.len() as u64 + 1);
            roles.push(Role {
                id,
                name: name.to_string(),
            });
        }
        let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        format!("roles: [{}]", names.join(", "))
    }

    fn react(&self, emoji: &str, added: bool) -> Option<Event> {
        let mut state = self.state.lock();
        let message = state.messages.get(&state.last_message?)?.to_ref();
        let reference = ReactionRef {
            channel_id: message.channel_id,
            message_id: message.message_id,
            emoji: emoji.to_string(),
        };
        let reaction = state
            .reactions
            .entry(reference.clone())
            .or_insert_with(|| Reaction {
                channel_id: message.channel_id,
                message_id: message.message_id,
                emoji: emoji.to_string(),
                count: 0,
            });
        reaction.count = if added {
            reaction.count + 1
        } else {
            reaction.count.saturating_sub(1)
        };

        let update = ReactionUpdate {
            reaction: Partial::Ref(reference),
            message: Partial::Ref(message),
            user_id: YOU,
        };
        Some(if added {
            Event::ReactionAdded(update)
        } else {
            Event::ReactionRemoved(update)
        })
    }

    fn toggle_voice(&self) -> Event {
        let mut state = self.state.lock();
        let old = state.voice;
        let new = if old.is_some() { None } else { Some(VOICE_CHANNEL) };
        state.voice = new;

        let voice = |channel_id| VoiceState {
            guild_id: GUILD,
            user_id: YOU,
            channel_id,
            self_mute: false,
            self_deaf: false,
        };
        Event::VoiceStateChanged(Box::new(VoiceStateUpdate {
            old: voice(old),
            old_member: Partial::Full(state.you.clone()),
            new: voice(new),
            new_member: Partial::Full(state.you.clone()),
        }))
    }

    fn print(&self, channel_id: ChannelId, content: &str) {
        let place = if channel_id == DM_CHANNEL {
            "dm".to_string()
        } else {
            format!("#{}", channel_name(channel_id))
        };
        println!("bot [{place}]> {content}");
    }
}

fn channel_name(channel_id: ChannelId) -> &'static str {
    match channel_id {
        TEXT_CHANNEL => "general",
        VOICE_CHANNEL => "voice",
        _ => "unknown",
    }
}

#[async_trait]
impl Platform for ConsolePlatform {
    async fn fetch_user(&self, id: UserId) -> ApiResult<User> {
        let state = self.state.lock();
        if id == YOU {
            Ok(state.you.user.clone())
        } else {
            Err(ApiError::not_found("user", id))
        }
    }

    async fn fetch_member(&self, guild_id: GuildId, user_id: UserId) -> ApiResult<Member> {
        let state = self.state.lock();
        if guild_id == GUILD && user_id == YOU {
            Ok(state.you.clone())
        } else {
            Err(ApiError::not_found("member", user_id))
        }
    }

    async fn fetch_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> ApiResult<Message> {
        self.state
            .lock()
            .messages
            .get(&message_id)
            .filter(|message| message.channel_id == channel_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("message", message_id))
    }

    async fn fetch_reaction(&self, reference: &ReactionRef) -> ApiResult<Reaction> {
        self.state
            .lock()
            .reactions
            .get(reference)
            .cloned()
            .ok_or_else(|| ApiError::not_found("reaction", &reference.emoji))
    }

    async fn guilds(&self) -> ApiResult<Vec<Guild>> {
        Ok(vec![self.guild.clone()])
    }

    async fn send_message(&self, channel_id: ChannelId, content: &str) -> ApiResult<MessageId> {
        self.print(channel_id, content);
        Ok(self.state.lock().next_id())
    }

    async fn send_private(&self, user_id: UserId, content: &str) -> ApiResult<MessageId> {
        if user_id != YOU {
            return Err(ApiError::Forbidden("cannot message that user".into()));
        }
        self.print(DM_CHANNEL, content);
        Ok(self.state.lock().next_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_posted_message_can_be_fetched() {
        let platform = ConsolePlatform::new("ada");
        let Some(Input::Event(Event::MessageReceived(event))) = platform.translate("hello")
        else {
            panic!("expected a message");
        };
        let Partial::Ref(reference) = event.message else {
            panic!("expected a partial message");
        };
        let message = platform
            .fetch_message(reference.channel_id, reference.message_id)
            .await
            .unwrap();
        assert_eq!(message.content, "hello");
        assert!(event.member.is_some());
    }

    #[test]
    fn test_toggles() {
        let platform = ConsolePlatform::new("ada");
        assert!(matches!(
            platform.translate(":role Moderator"),
            Some(Input::Console(text)) if text == "roles: [Moderator]"
        ));
        assert!(matches!(
            platform.translate(":role moderator"),
            Some(Input::Console(text)) if text == "roles: []"
        ));
        assert!(matches!(platform.translate(":react 👍"), Some(Input::Console(_))));
        assert!(matches!(platform.translate(":quit"), Some(Input::Quit)));
        assert!(platform.translate("   ").is_none());
    }
}
