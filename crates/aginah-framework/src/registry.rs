//! The handler registry.
//!
//! Registration happens in two phases that the types keep apart:
//!
//! 1. **Write phase**: a [`RegistryBuilder`] collects command categories and
//!    listeners, in order, from an explicit manifest of [`Registration`]s.
//! 2. **Read phase**: [`RegistryBuilder::build`] seals everything into a
//!    [`HandlerRegistry`], shared as `Arc<HandlerRegistry>` by every event.
//!
//! A sealed registry cannot be modified, so nothing is ever registered while
//! events are being dispatched.
//!
//! # Name collisions
//!
//! Command names are unique. Registering a second command with a name already
//! taken replaces the first one (load order matters); the collision is logged
//! at `warn`. Aliases never replace anything: when several commands share an
//! alias, the one registered first wins.
//!
//! # Example
//!
//! ```rust,ignore
//! static MANIFEST: &[Registration] = &[
//!     Registration::Category(fun::category),
//!     Registration::Category(moderation::category),
//!     Registration::MessageListener(greeting::listener),
//! ];
//!
//! let registry = RegistryBuilder::new().install_all(MANIFEST).build();
//! assert!(registry.lookup("roll").is_some());
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::command::{Command, CommandCategory};
use crate::listener::{ListenerKind, MessageListener, ReactionListener, VoiceStateListener};

/// One entry of a registration manifest.
///
/// Each variant holds a constructor, so a manifest can be a `static` slice
/// that lists every handler module of the bot in load order.
#[derive(Clone, Copy)]
pub enum Registration {
    Category(fn() -> CommandCategory),
    MessageListener(fn() -> MessageListener),
    ReactionListener(fn() -> ReactionListener),
    VoiceStateListener(fn() -> VoiceStateListener),
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Category(_) => "Category",
            Self::MessageListener(_) => "MessageListener",
            Self::ReactionListener(_) => "ReactionListener",
            Self::VoiceStateListener(_) => "VoiceStateListener",
        };
        f.debug_tuple("Registration").field(&kind).finish()
    }
}

// ============================================================================
// RegistryBuilder
// ============================================================================

/// The write phase of a [`HandlerRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    categories: Vec<CommandCategory>,
    commands: Vec<Arc<Command>>,
    by_name: HashMap<String, usize>,
    message_listeners: Vec<MessageListener>,
    reaction_listeners: Vec<ReactionListener>,
    voice_state_listeners: Vec<VoiceStateListener>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a category's commands and records the category for help.
    ///
    /// A command whose name is already registered replaces the earlier one in
    /// place.
    pub fn register(mut self, category: CommandCategory) -> Self {
        for command in category.commands() {
            match self.by_name.entry(command.name().to_string()) {
                Entry::Occupied(slot) => {
                    warn!(
                        command = command.name(),
                        category = category.name(),
                        "Command name already registered, replacing the earlier one"
                    );
                    self.commands[*slot.get()] = command.clone();
                }
                Entry::Vacant(slot) => {
                    slot.insert(self.commands.len());
                    self.commands.push(command.clone());
                }
            }
        }
        debug!(
            category = category.name(),
            commands = category.commands().len(),
            "Registered command category"
        );
        self.categories.push(category);
        self
    }

    pub fn message_listener(mut self, listener: MessageListener) -> Self {
        debug!(listener = listener.name(), kind = %ListenerKind::Message, "Registered listener");
        self.message_listeners.push(listener);
        self
    }

    pub fn reaction_listener(mut self, listener: ReactionListener) -> Self {
        debug!(listener = listener.name(), kind = %ListenerKind::Reaction, "Registered listener");
        self.reaction_listeners.push(listener);
        self
    }

    pub fn voice_state_listener(mut self, listener: VoiceStateListener) -> Self {
        debug!(listener = listener.name(), kind = %ListenerKind::VoiceState, "Registered listener");
        self.voice_state_listeners.push(listener);
        self
    }

    /// Runs one manifest entry.
    pub fn install(self, registration: Registration) -> Self {
        match registration {
            Registration::Category(build) => self.register(build()),
            Registration::MessageListener(build) => self.message_listener(build()),
            Registration::ReactionListener(build) => self.reaction_listener(build()),
            Registration::VoiceStateListener(build) => self.voice_state_listener(build()),
        }
    }

    /// Runs every manifest entry in order.
    pub fn install_all<'a>(self, manifest: impl IntoIterator<Item = &'a Registration>) -> Self {
        manifest.into_iter().copied().fold(self, Self::install)
    }

    /// Seals the registry.
    pub fn build(self) -> HandlerRegistry {
        let mut by_alias = HashMap::new();
        for (index, command) in self.commands.iter().enumerate() {
            for alias in command.alias_names() {
                by_alias.entry(alias.clone()).or_insert(index);
            }
        }
        HandlerRegistry {
            categories: self.categories,
            commands: self.commands,
            by_name: self.by_name,
            by_alias,
            message_listeners: self.message_listeners,
            reaction_listeners: self.reaction_listeners,
            voice_state_listeners: self.voice_state_listeners,
        }
    }
}

// ============================================================================
// HandlerRegistry
// ============================================================================

/// The sealed, read-only set of commands and listeners.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    categories: Vec<CommandCategory>,
    /// In registration order of the first use of each name.
    commands: Vec<Arc<Command>>,
    by_name: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
    message_listeners: Vec<MessageListener>,
    reaction_listeners: Vec<ReactionListener>,
    voice_state_listeners: Vec<VoiceStateListener>,
}

impl HandlerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Finds a command by exact name, then by alias.
    pub fn lookup(&self, name: &str) -> Option<&Arc<Command>> {
        self.by_name
            .get(name)
            .or_else(|| self.by_alias.get(name))
            .map(|&index| &self.commands[index])
    }

    /// Returns every category in registration order.
    ///
    /// A category keeps the commands it was registered with, even those later
    /// replaced by a same-named command.
    pub fn categories(&self) -> &[CommandCategory] {
        &self.categories
    }

    /// Returns the effective commands.
    pub fn commands(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.commands.iter()
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn message_listeners(&self) -> &[MessageListener] {
        &self.message_listeners
    }

    pub fn reaction_listeners(&self) -> &[ReactionListener] {
        &self.reaction_listeners
    }

    pub fn voice_state_listeners(&self) -> &[VoiceStateListener] {
        &self.voice_state_listeners
    }

    /// Returns the names of the listeners of one kind, in fan-out order.
    pub fn listeners_of(&self, kind: ListenerKind) -> Vec<&str> {
        match kind {
            ListenerKind::Message => self.message_listeners.iter().map(|l| l.name()).collect(),
            ListenerKind::Reaction => self.reaction_listeners.iter().map(|l| l.name()).collect(),
            ListenerKind::VoiceState => {
                self.voice_state_listeners.iter().map(|l| l.name()).collect()
            }
        }
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        match kind {
            ListenerKind::Message => self.message_listeners.len(),
            ListenerKind::Reaction => self.reaction_listeners.len(),
            ListenerKind::VoiceState => self.voice_state_listeners.len(),
        }
    }
}
