//! Commands and command categories.
//!
//! A [`Command`] is an async function plus the metadata the authorization
//! policy needs. Commands are grouped into [`CommandCategory`]s, which is the
//! unit of registration and of help display.
//!
//! ```rust,ignore
//! use aginah_framework::command::{Command, CommandCategory};
//!
//! async fn ban(ctx: InvocationContext, args: Vec<String>) -> Result<(), ApiError> {
//!     ctx.reply(&format!("banned {}", args.join(" "))).await.map(|_| ())
//! }
//!
//! fn moderation() -> CommandCategory {
//!     CommandCategory::new("moderation")
//!         .description("Keeping the peace")
//!         .command(Command::new("ban", ban).guild_only().admin_only())
//!         .command(
//!             Command::new("mute", mute)
//!                 .alias("silence")
//!                 .guild_only()
//!                 .minimum_role("moderator"),
//!         )
//! }
//! ```

pub mod parse;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::context::InvocationContext;
use crate::handler::{BoxFuture, HandlerResult, IntoHandlerResult};
use crate::policy::RoleTier;

pub use parse::{ParsedCommand, parse_command};

/// The type-erased body of a command.
pub type CommandFn =
    Arc<dyn Fn(InvocationContext, Vec<String>) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

// ============================================================================
// Command
// ============================================================================

/// A named, invocable command.
///
/// Built once at startup and never mutated after registration. The name is
/// matched against the lower-cased first token of a message, so it should be
/// given in lower case.
#[derive(Clone)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    description: String,
    usage: String,
    guild_only: bool,
    admin_only: bool,
    minimum_role: Option<RoleTier>,
    execute: CommandFn,
}

impl Command {
    /// Creates a command that may run anywhere, for anyone.
    pub fn new<F, Fut, R>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(InvocationContext, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoHandlerResult,
    {
        let execute: CommandFn = Arc::new(move |ctx, args| {
            let fut = f(ctx, args);
            Box::pin(async move { fut.await.into_handler_result() })
        });
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            usage: String::new(),
            guild_only: false,
            admin_only: false,
            minimum_role: None,
            execute,
        }
    }

    /// Adds an alternative name. Duplicates are ignored.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self
    }

    /// Adds several alternative names.
    pub fn aliases<I, S>(self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        aliases.into_iter().fold(self, |cmd, alias| cmd.alias(alias))
    }

    /// Restricts the command to guild channels.
    pub fn guild_only(mut self) -> Self {
        self.guild_only = true;
        self
    }

    /// Restricts the command to administrators.
    ///
    /// Only takes effect together with [`guild_only`](Self::guild_only);
    /// direct messages carry no member to check.
    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    /// Requires the invoking member to hold at least the given role tier.
    ///
    /// Like [`admin_only`](Self::admin_only), only checked for guild-only
    /// commands. Ignored when the command is also admin-only.
    pub fn minimum_role(mut self, tier: impl Into<RoleTier>) -> Self {
        self.minimum_role = Some(tier.into());
        self
    }

    /// Sets the one-line description shown by help.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the usage line shown by help, without prefix or name.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_names(&self) -> &[String] {
        &self.aliases
    }

    /// Returns `true` if `name` is one of this command's aliases.
    pub fn has_alias(&self, name: &str) -> bool {
        self.aliases.iter().any(|a| a == name)
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn get_usage(&self) -> &str {
        &self.usage
    }

    pub fn is_guild_only(&self) -> bool {
        self.guild_only
    }

    pub fn is_admin_only(&self) -> bool {
        self.admin_only
    }

    pub fn required_role(&self) -> Option<&RoleTier> {
        self.minimum_role.as_ref()
    }

    /// Runs the command body.
    pub fn execute(
        &self,
        ctx: InvocationContext,
        args: Vec<String>,
    ) -> BoxFuture<'static, HandlerResult> {
        (self.execute)(ctx, args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("guild_only", &self.guild_only)
            .field("admin_only", &self.admin_only)
            .field("minimum_role", &self.minimum_role)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// CommandCategory
// ============================================================================

/// A named group of commands.
#[derive(Debug, Clone)]
pub struct CommandCategory {
    name: String,
    description: String,
    commands: Vec<Arc<Command>>,
}

impl CommandCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            commands: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a command to this category.
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(Arc::new(command));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    /// Returns the commands in the order they were added.
    pub fn commands(&self) -> &[Arc<Command>] {
        &self.commands
    }
}
