//! Command authorization.
//!
//! [`AuthorizationPolicy::authorize`] decides whether a looked-up command may
//! run for the invoking author. Rules are evaluated in a fixed order and the
//! first applicable one decides:
//!
//! 1. the author is a bot: drop silently
//! 2. the command was not found: "unknown command", sent to the channel
//! 3. the command is not guild-only: execute
//! 4. there is no guild: "guild only", replied
//! 5. the command is admin-only: execute iff the member is an admin, else
//!    "no permission", sent privately to the author
//! 6. the command has no minimum role: execute
//! 7. execute iff the member meets the minimum role, else "not authorized",
//!    replied
//!
//! Because rule 5 decides before rule 7 is reached, an admin-only command's
//! minimum role is never consulted.

use std::fmt;
use std::sync::Arc;

use aginah_core::{GuildId, Member, User};

use crate::command::Command;

// ============================================================================
// Role tiers
// ============================================================================

/// The name of a role tier, such as `"moderator"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleTier(String);

impl RoleTier {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoleTier {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RoleTier {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for RoleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Answers the two role questions the policy asks about a member.
pub trait RoleVerifier: Send + Sync + 'static {
    /// Returns `true` if the member is an administrator.
    fn is_admin(&self, member: &Member) -> bool;

    /// Returns `true` if the member holds `minimum` or a higher tier.
    fn meets_minimum_role(&self, member: &Member, minimum: &RoleTier) -> bool;
}

/// A [`RoleVerifier`] backed by an ordered list of tier names.
///
/// Tiers are given lowest first; a member meets a minimum tier when one of
/// their roles (matched by name, case-insensitively) ranks at or above it.
/// Administrators meet every tier. A minimum tier missing from the list is
/// never met.
#[derive(Debug, Clone, Default)]
pub struct TieredRoles {
    tiers: Vec<String>,
}

impl TieredRoles {
    pub fn new<I, S>(tiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tiers: tiers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tiers(&self) -> &[String] {
        &self.tiers
    }

    fn rank_of(&self, name: &str) -> Option<usize> {
        self.tiers.iter().position(|t| t.eq_ignore_ascii_case(name))
    }

    fn member_rank(&self, member: &Member) -> Option<usize> {
        member
            .roles
            .iter()
            .filter_map(|role| self.rank_of(&role.name))
            .max()
    }
}

impl RoleVerifier for TieredRoles {
    fn is_admin(&self, member: &Member) -> bool {
        member.administrator
    }

    fn meets_minimum_role(&self, member: &Member, minimum: &RoleTier) -> bool {
        if member.administrator {
            return true;
        }
        match (self.rank_of(minimum.as_str()), self.member_rank(member)) {
            (Some(required), Some(held)) => held >= required,
            _ => false,
        }
    }
}

// ============================================================================
// Decisions
// ============================================================================

/// Why a command invocation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    UnknownCommand,
    GuildOnly,
    NoPermission,
    NotAuthorized,
}

/// Where a denial message is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// A plain message in the invoking channel.
    Channel,
    /// A reply to the invoking message.
    Reply,
    /// A direct message to the author.
    Private,
}

impl Denial {
    /// Returns the text shown to the user.
    pub fn message(self, prefix: &str) -> String {
        match self {
            Self::UnknownCommand => {
                format!("I don't know that command. Use `{prefix}help` for more info.")
            }
            Self::GuildOnly => "That command may only be used in a server.".to_string(),
            Self::NoPermission => "You do not have permission to use that command.".to_string(),
            Self::NotAuthorized => "You are not authorized to use that command.".to_string(),
        }
    }

    pub fn delivery(self) -> Delivery {
        match self {
            Self::UnknownCommand => Delivery::Channel,
            Self::GuildOnly | Self::NotAuthorized => Delivery::Reply,
            Self::NoPermission => Delivery::Private,
        }
    }
}

/// The result of evaluating the policy.
#[derive(Debug)]
pub enum Decision<'a> {
    /// Ignore the invocation without a response.
    Drop,
    /// Refuse the invocation with a message.
    Deny(Denial),
    /// Run the command.
    Execute(&'a Command),
}

// ============================================================================
// AuthorizationPolicy
// ============================================================================

/// Decides whether a command may run.
#[derive(Clone)]
pub struct AuthorizationPolicy {
    verifier: Arc<dyn RoleVerifier>,
}

impl AuthorizationPolicy {
    pub fn new(verifier: impl RoleVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }

    pub fn from_arc(verifier: Arc<dyn RoleVerifier>) -> Self {
        Self { verifier }
    }

    /// Evaluates the rules for one invocation.
    ///
    /// `member` is the author's membership in `guild_id`; a guild invocation
    /// without member data fails the admin and role checks.
    pub fn authorize<'a>(
        &self,
        author: &User,
        command: Option<&'a Command>,
        guild_id: Option<GuildId>,
        member: Option<&Member>,
    ) -> Decision<'a> {
        if author.bot {
            return Decision::Drop;
        }
        let Some(command) = command else {
            return Decision::Deny(Denial::UnknownCommand);
        };
        if !command.is_guild_only() {
            return Decision::Execute(command);
        }
        if guild_id.is_none() {
            return Decision::Deny(Denial::GuildOnly);
        }
        if command.is_admin_only() {
            return match member {
                Some(m) if self.verifier.is_admin(m) => Decision::Execute(command),
                _ => Decision::Deny(Denial::NoPermission),
            };
        }
        let Some(minimum) = command.required_role() else {
            return Decision::Execute(command);
        };
        match member {
            Some(m) if self.verifier.meets_minimum_role(m, minimum) => Decision::Execute(command),
            _ => Decision::Deny(Denial::NotAuthorized),
        }
    }
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        Self::new(TieredRoles::default())
    }
}

impl fmt::Debug for AuthorizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationPolicy").finish_non_exhaustive()
    }
}
