//! Aginah Runtime - the process around the dispatcher.
//!
//! This crate provides:
//! - Layered configuration loading (`ConfigLoader`, `AginahConfig`)
//! - Subscriber installation from the `[logging]` table (`LogSetup`)
//! - The event loop (`AginahRuntime`): one task per event, a readiness gate
//!   released after guild setups are verified, cooperative shutdown
//! - Collaborator traits for what lives outside the dispatcher
//!   (`GuildHooks`, `ErrorReporter`)
//!
//! ```ignore
//! use aginah_runtime::AginahRuntime;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = AginahRuntime::builder()
//!         .register(fun::category())
//!         .message_listener(greeter::listener())
//!         .build()?;
//!
//!     let (tx, rx) = tokio::sync::mpsc::channel(64);
//!     let platform = my_adapter::connect(&runtime.config().token, tx).await?;
//!
//!     // Run until Ctrl+C
//!     runtime.run(platform, rx).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{AginahConfig, ConfigError, ConfigLoader, ConfigResult, Profile};
pub use error::{RuntimeError, RuntimeResult};
pub use hooks::{ErrorReporter, GuildHooks, NoopGuildHooks, TracingErrorReporter};
pub use logging::{LogSetup, init_from_config};
pub use runtime::{AginahRuntime, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
