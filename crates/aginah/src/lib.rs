//! # Aginah
//!
//! A command and event dispatcher for chat bots.
//!
//! ## Overview
//!
//! Aginah loads command categories and event listeners once at startup, then
//! routes every platform event to them: prefixed messages become command
//! invocations checked against an authorization policy, everything else is
//! fanned out to the listeners registered for it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  Event  ┌─────────┐     ┌────────────┐     ┌─────────────────────────────┐
//! │   Adapter   │────────▶│ Runtime │────▶│ Dispatcher │────▶│ ErrorBoundary ▶ Policy ▶ Cmd │
//! │ (Platform)  │         │ (1 task │     │ (resolves  │     └─────────────────────────────┘
//! └─────────────┘         │  /event)│     │  partials) │────▶ listeners, in order
//!                         └─────────┘     └────────────┘
//! ```
//!
//! - **Runtime**: configuration, logging, the readiness gate and lifecycle
//!   hooks
//! - **Dispatcher**: partial resolution, command parsing, listener fan-out
//! - **Policy**: guild-only, admin-only and minimum-role checks
//! - **ErrorBoundary**: turns a failing command into one apology reply
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use aginah::prelude::*;
//!
//! async fn roll(ctx: InvocationContext, args: Vec<String>) -> HandlerResult {
//!     let sides: u32 = args.first().map_or(Ok(6), |s| s.parse())?;
//!     ctx.reply(&format!("rolled a d{sides}")).await?;
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = AginahRuntime::builder()
//!         .register(CommandCategory::new("Fun").command(Command::new("roll", roll).alias("r")))
//!         .build()?;
//!
//!     let (tx, rx) = tokio::sync::mpsc::channel(64);
//!     let platform = my_adapter::connect(&runtime.config().token, tx).await?;
//!     runtime.run(platform, rx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log format

pub use aginah_core as core;
pub use aginah_framework as framework;
pub use aginah_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use aginah::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use aginah_runtime::{
        AginahConfig, AginahRuntime, ErrorReporter, GuildHooks, RuntimeError, RuntimeResult,
    };

    // Handler definitions
    pub use aginah_framework::{
        BoxError, Command, CommandCategory, HandlerResult, InvocationContext, Listener,
        MessageListener, ReactionContext, ReactionListener, Registration, RoleTier,
        VoiceStateContext, VoiceStateListener,
    };

    // Authorization
    pub use aginah_framework::{AuthorizationPolicy, RoleVerifier, TieredRoles};

    // Platform model
    pub use aginah_core::{
        ApiError, ApiResult, BoxedPlatform, Event, Guild, Member, Message, Platform, User,
    };
}
