//! Main runtime: configuration, handler registration and the event loop.
//!
//! An adapter owns the connection to the chat platform and pushes every
//! platform [`Event`] into an `mpsc` channel. The runtime reads that channel
//! and spawns one task per event, so a slow handler only stalls its own event.
//!
//! # Readiness Gate
//!
//! Message, reaction and voice-state events are held until the guild setups
//! have been verified after [`Event::ConnectionReady`]. Guild and connection
//! events bypass the gate and go to the [`GuildHooks`] and the
//! [`ErrorReporter`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use aginah_runtime::AginahRuntime;
//!
//! let runtime = AginahRuntime::builder()
//!     .config_file("aginah.toml")
//!     .install_all(&MANIFEST)
//!     .build()?;
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(64);
//! let platform = my_adapter::connect(runtime.config(), tx).await?;
//! runtime.run(platform, rx).await?;
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use serde::Serialize;
use tokio::signal;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use aginah_core::{BoxedPlatform, Event, EventKind, Guild};
use aginah_framework::{
    AuthorizationPolicy, CommandCategory, Dispatcher, HandlerRegistry, ListenerKind,
    MessageListener, ReactionListener, Registration, RegistryBuilder, RoleVerifier, TieredRoles,
    VoiceStateListener, panic_message,
};

use crate::config::{AginahConfig, ConfigLoader, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::hooks::{ErrorReporter, GuildHooks, NoopGuildHooks, TracingErrorReporter};
use crate::logging;

/// State of the readiness gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    /// No `ConnectionReady` seen yet.
    Pending,
    /// Guild setups are being verified.
    Verifying,
    /// Handler events flow.
    Open,
}

/// The Aginah runtime.
///
/// Built once through [`RuntimeBuilder`]; the handler registry is sealed at
/// that point.
///
/// ```rust,ignore
/// let runtime = AginahRuntime::builder()
///     .profile("production")
///     .register(moderation::category())
///     .message_listener(greeter::listener())
///     .guild_hooks(SetupStore::open(&db)?)
///     .build()?;
/// ```
#[derive(Debug)]
pub struct AginahRuntime {
    config: AginahConfig,
    dispatcher: Dispatcher,
    hooks: Arc<dyn GuildHooks>,
    reporter: Arc<dyn ErrorReporter>,
    shutdown: CancellationToken,
    running: AtomicBool,
}

impl AginahRuntime {
    /// Creates a runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &AginahConfig {
        &self.config
    }

    /// Returns the dispatcher every event handler task uses.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Returns the sealed handler registry.
    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        self.dispatcher.registry()
    }

    /// Returns a token that is cancelled when the runtime shuts down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stops a running event loop. In-flight event tasks are aborted.
    ///
    /// The runtime cannot be run again afterwards.
    pub fn shutdown(&self) {
        info!("Shutdown requested");
        self.shutdown.cancel();
    }

    /// Runs the event loop until the event channel closes, Ctrl+C (or SIGTERM
    /// on Unix) is received, or [`shutdown`](Self::shutdown) is called.
    pub async fn run(
        &self,
        platform: BoxedPlatform,
        events: mpsc::Receiver<Event>,
    ) -> RuntimeResult<()> {
        info!("Aginah runtime is now running. Press Ctrl+C to stop.");
        self.run_until(platform, events, wait_for_signal()).await
    }

    /// Runs the event loop with a custom shutdown future.
    ///
    /// When the event channel closes, events already received are processed
    /// to completion before this returns. When `shutdown` completes or the
    /// runtime is shut down, in-flight tasks are aborted.
    pub async fn run_until<F>(
        &self,
        platform: BoxedPlatform,
        mut events: mpsc::Receiver<Event>,
        shutdown: F,
    ) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Runtime is already running");
            return Err(RuntimeError::AlreadyRunning);
        }

        let (gate_tx, gate_rx) = watch::channel(Gate::Pending);
        let worker = EventWorker {
            platform,
            dispatcher: self.dispatcher.clone(),
            hooks: self.hooks.clone(),
            reporter: self.reporter.clone(),
            gate_tx: Arc::new(gate_tx),
            gate_rx,
            cancelled: self.shutdown.child_token(),
        };
        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown);

        let drain = loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break false,
                _ = &mut shutdown => break false,
                event = events.recv() => match event {
                    Some(event) => {
                        if event.kind() == EventKind::ConnectionReady {
                            worker.begin_verification();
                        }
                        tasks.spawn(worker.clone().process(event));
                    }
                    None => {
                        info!("Event channel closed");
                        break true;
                    }
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(err) = joined {
                        debug!(error = %err, "Event task did not complete");
                    }
                }
            }
        };

        if drain {
            // Nothing will open a gate that never saw `ConnectionReady`.
            if *worker.gate_rx.borrow() == Gate::Pending {
                worker.cancelled.cancel();
            }
            while tasks.join_next().await.is_some() {}
        } else {
            worker.cancelled.cancel();
            tasks.shutdown().await;
        }

        self.running.store(false, Ordering::SeqCst);
        info!("Aginah runtime stopped");
        Ok(())
    }
}

/// Waits for Ctrl+C, or SIGTERM on Unix.
async fn wait_for_signal() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c() => {}
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
            }
            Err(err) => {
                warn!(error = %err, "Failed to register SIGTERM handler");
                ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
    }
}

async fn ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(err) => {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// EventWorker
// =============================================================================

/// Everything one event task needs.
#[derive(Clone)]
struct EventWorker {
    platform: BoxedPlatform,
    dispatcher: Dispatcher,
    hooks: Arc<dyn GuildHooks>,
    reporter: Arc<dyn ErrorReporter>,
    gate_tx: Arc<watch::Sender<Gate>>,
    gate_rx: watch::Receiver<Gate>,
    cancelled: CancellationToken,
}

impl EventWorker {
    fn begin_verification(&self) {
        self.gate_tx.send_if_modified(|gate| {
            if *gate == Gate::Pending {
                *gate = Gate::Verifying;
                true
            } else {
                false
            }
        });
    }

    /// Processes one event; panics are reported, never propagated.
    async fn process(self, event: Event) {
        let name = event.event_name();
        let reporter = self.reporter.clone();
        if let Err(panic) = AssertUnwindSafe(self.route(event)).catch_unwind().await {
            reporter.report(&RuntimeError::Panic {
                event: name,
                message: panic_message(panic.as_ref()),
            });
        }
    }

    async fn route(mut self, event: Event) {
        match event {
            Event::ConnectionReady => self.on_ready().await,
            Event::ConnectionError(err) => self.reporter.report(&RuntimeError::Connection(err)),
            Event::GuildJoined(guild) => self.on_guild_joined(guild).await,
            Event::GuildLeft(guild) => self.on_guild_left(guild).await,
            event => {
                if !self.wait_ready().await {
                    debug!(
                        event_name = event.event_name(),
                        "Dropping event received before the connection was ready"
                    );
                    return;
                }
                match self.dispatcher.dispatch(self.platform.clone(), event).await {
                    Ok(outcome) => trace!(?outcome, "Event dispatched"),
                    Err(err) => self.reporter.report(&RuntimeError::Dispatch(err)),
                }
            }
        }
    }

    /// Waits until the gate opens. Returns `false` if the run ended first.
    async fn wait_ready(&mut self) -> bool {
        tokio::select! {
            opened = self.gate_rx.wait_for(|gate| *gate == Gate::Open) => opened.is_ok(),
            _ = self.cancelled.cancelled() => false,
        }
    }

    async fn on_ready(&self) {
        if let Err(err) = self.hooks.verify_guild_setups(&self.platform).await {
            self.reporter
                .report(&RuntimeError::hook("verify_guild_setups", err));
        }
        self.gate_tx.send_replace(Gate::Open);

        match self.platform.guilds().await {
            Ok(guilds) => info!("Connected. Active in {} guilds.", guilds.len()),
            Err(err) => self.reporter.report(&RuntimeError::Connection(err)),
        }
    }

    async fn on_guild_joined(&self, guild: Guild) {
        info!(guild = %guild.id, name = %guild.name, "Joined guild");
        if let Err(err) = self.hooks.on_guild_joined(&self.platform, &guild).await {
            self.reporter
                .report(&RuntimeError::hook("on_guild_joined", err));
        }
    }

    async fn on_guild_left(&self, guild: Guild) {
        info!(guild = %guild.id, name = %guild.name, "Left guild");
        if let Err(err) = self.hooks.on_guild_left(&self.platform, &guild).await {
            self.reporter.report(&RuntimeError::hook("on_guild_left", err));
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating an [`AginahRuntime`].
///
/// Configuration is loaded through a [`ConfigLoader`] searching the working
/// directory and the user configuration directory, unless a complete [`AginahConfig`] is supplied with
/// [`config`](Self::config).
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    config: Option<AginahConfig>,
    registry: RegistryBuilder,
    hooks: Arc<dyn GuildHooks>,
    reporter: Arc<dyn ErrorReporter>,
    verifier: Option<Arc<dyn RoleVerifier>>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
            config: None,
            registry: RegistryBuilder::new(),
            hooks: Arc::new(NoopGuildHooks),
            reporter: Arc::new(TracingErrorReporter),
            verifier: None,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Overrides a single configuration key, e.g. `set("dev_mode", true)`.
    pub fn set<T: Serialize>(mut self, key: &str, value: T) -> Self {
        self.config_loader = self.config_loader.set(key, value);
        self
    }

    /// Uses this configuration instead of loading one. It is still validated.
    pub fn config(mut self, config: AginahConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Registers a command category.
    pub fn register(mut self, category: CommandCategory) -> Self {
        self.registry = self.registry.register(category);
        self
    }

    pub fn message_listener(mut self, listener: MessageListener) -> Self {
        self.registry = self.registry.message_listener(listener);
        self
    }

    pub fn reaction_listener(mut self, listener: ReactionListener) -> Self {
        self.registry = self.registry.reaction_listener(listener);
        self
    }

    pub fn voice_state_listener(mut self, listener: VoiceStateListener) -> Self {
        self.registry = self.registry.voice_state_listener(listener);
        self
    }

    /// Installs every entry of a registration manifest, in order.
    pub fn install_all<'a>(mut self, manifest: impl IntoIterator<Item = &'a Registration>) -> Self {
        self.registry = self.registry.install_all(manifest);
        self
    }

    /// Sets the guild hooks. Defaults to [`NoopGuildHooks`].
    pub fn guild_hooks(mut self, hooks: impl GuildHooks) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    /// Sets the general error handler. Defaults to [`TracingErrorReporter`].
    pub fn error_reporter(mut self, reporter: impl ErrorReporter) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    /// Sets the role verifier. Defaults to [`TieredRoles`] over the
    /// configured `roles.tiers`.
    pub fn role_verifier(mut self, verifier: impl RoleVerifier) -> Self {
        self.verifier = Some(Arc::new(verifier));
        self
    }

    /// Loads the configuration, initializes logging and seals the registry.
    pub fn build(self) -> RuntimeResult<AginahRuntime> {
        let config = match self.config {
            Some(config) => {
                validate_config(&config)?;
                config
            }
            None => self.config_loader.load()?,
        };

        logging::init_from_config(&config);
        debug!(?config, "Configuration loaded");

        let registry = Arc::new(self.registry.build());
        info!(
            commands = registry.command_count(),
            message_listeners = registry.listener_count(ListenerKind::Message),
            reaction_listeners = registry.listener_count(ListenerKind::Reaction),
            voice_state_listeners = registry.listener_count(ListenerKind::VoiceState),
            "Handlers loaded"
        );

        let verifier = self
            .verifier
            .unwrap_or_else(|| Arc::new(TieredRoles::new(config.roles.tiers.clone())));
        let dispatcher = Dispatcher::new(
            registry,
            AuthorizationPolicy::from_arc(verifier),
            config.command_prefix.clone(),
        );

        Ok(AginahRuntime {
            config,
            dispatcher,
            hooks: self.hooks,
            reporter: self.reporter,
            shutdown: CancellationToken::new(),
            running: AtomicBool::new(false),
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use aginah_core::{
        ApiError, ApiResult, ChannelId, GuildId, Member, Message, MessageCreate, MessageId,
        Partial, Platform, Reaction, ReactionRef, User, UserId,
    };
    use aginah_framework::{Command, HandlerResult, InvocationContext, Listener};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::sync::Notify;
    use tokio_test::assert_ok;

    use super::*;

    #[derive(Default)]
    struct StubPlatform {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Platform for StubPlatform {
        async fn fetch_user(&self, id: UserId) -> ApiResult<User> {
            Err(ApiError::not_found("user", id))
        }

        async fn fetch_member(&self, _guild_id: GuildId, user_id: UserId) -> ApiResult<Member> {
            Err(ApiError::not_found("member", user_id))
        }

        async fn fetch_message(
            &self,
            _channel_id: ChannelId,
            message_id: MessageId,
        ) -> ApiResult<Message> {
            Err(ApiError::not_found("message", message_id))
        }

        async fn fetch_reaction(&self, reference: &ReactionRef) -> ApiResult<Reaction> {
            Err(ApiError::not_found("reaction", &reference.emoji))
        }

        async fn guilds(&self) -> ApiResult<Vec<Guild>> {
            Ok(vec![guild(1), guild(2)])
        }

        async fn send_message(&self, _channel_id: ChannelId, content: &str) -> ApiResult<MessageId> {
            self.sent.lock().push(content.to_string());
            Ok(MessageId(1))
        }

        async fn send_private(&self, _user_id: UserId, content: &str) -> ApiResult<MessageId> {
            self.sent.lock().push(content.to_string());
            Ok(MessageId(2))
        }
    }

    fn guild(id: u64) -> Guild {
        Guild {
            id: GuildId(id),
            name: format!("guild-{id}"),
        }
    }

    fn dm(content: &str) -> Event {
        Event::MessageReceived(MessageCreate {
            message: Partial::Full(Message {
                id: MessageId(10),
                channel_id: ChannelId(50),
                guild_id: None,
                author_id: UserId(7),
                content: content.to_string(),
            }),
            author: Partial::Full(User {
                id: UserId(7),
                name: "ada".into(),
                bot: false,
            }),
            member: None,
        })
    }

    fn config() -> AginahConfig {
        AginahConfig {
            token: "test-token".into(),
            ..Default::default()
        }
    }

    type Reports = Arc<Mutex<Vec<String>>>;

    fn reporter() -> (Reports, impl ErrorReporter) {
        let reports = Reports::default();
        let sink = reports.clone();
        (reports, move |error: &RuntimeError| {
            sink.lock().push(error.to_string())
        })
    }

    #[derive(Clone, Default)]
    struct GatedHooks {
        release: Arc<Notify>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl GuildHooks for GatedHooks {
        async fn on_guild_joined(&self, _platform: &BoxedPlatform, guild: &Guild) -> HandlerResult {
            self.calls.lock().push(format!("joined {}", guild.id));
            Ok(())
        }

        async fn on_guild_left(&self, _platform: &BoxedPlatform, guild: &Guild) -> HandlerResult {
            self.calls.lock().push(format!("left {}", guild.id));
            Err("setup store offline".into())
        }

        async fn verify_guild_setups(&self, _platform: &BoxedPlatform) -> HandlerResult {
            self.release.notified().await;
            self.calls.lock().push("verified".into());
            Ok(())
        }
    }

    #[test]
    fn test_build_rejects_missing_token() {
        let result = AginahRuntime::builder()
            .config(AginahConfig::default())
            .build();
        assert!(matches!(result, Err(RuntimeError::Config(_))));
    }

    #[test]
    fn test_build_seals_registry() {
        let runtime = AginahRuntime::builder()
            .config(config())
            .register(
                CommandCategory::new("Fun").command(Command::new("roll", |_ctx, _args| async {})),
            )
            .message_listener(Listener::new("greeter", |_ctx: InvocationContext| async {}))
            .build();
        let runtime = assert_ok!(runtime);
        assert_eq!(runtime.registry().command_count(), 1);
        assert_eq!(runtime.registry().listener_count(ListenerKind::Message), 1);
        assert_eq!(runtime.dispatcher().prefix(), "!");
    }

    #[tokio::test]
    async fn test_gate_holds_messages_until_verified() {
        let hooks = GatedHooks::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let runtime = AginahRuntime::builder()
            .config(config())
            .guild_hooks(hooks.clone())
            .message_listener(Listener::new(
                "recorder",
                move |ctx: InvocationContext| {
                    let sink = sink.clone();
                    async move {
                        sink.lock().push(ctx.content().to_string());
                    }
                },
            ))
            .build()
            .unwrap();

        let (tx, rx) = mpsc::channel(8);
        let platform: BoxedPlatform = Arc::new(StubPlatform::default());
        tx.send(Event::ConnectionReady).await.unwrap();
        tx.send(dm("hello")).await.unwrap();

        let run = runtime.run_until(platform, rx, std::future::pending());
        tokio::pin!(run);
        let _ = tokio::time::timeout(Duration::from_millis(50), &mut run).await;
        assert!(seen.lock().is_empty());

        hooks.release.notify_one();
        drop(tx);
        assert_ok!(run.await);
        assert_eq!(*seen.lock(), vec!["hello"]);
        assert_eq!(*hooks.calls.lock(), vec!["verified"]);
    }

    #[tokio::test]
    async fn test_events_before_ready_are_dropped_on_close() {
        let seen = Arc::new(Mutex::new(0usize));
        let sink = seen.clone();
        let runtime = AginahRuntime::builder()
            .config(config())
            .message_listener(Listener::new("counter", move |_ctx: InvocationContext| {
                let sink = sink.clone();
                async move {
                    *sink.lock() += 1;
                }
            }))
            .build()
            .unwrap();

        let (tx, rx) = mpsc::channel(8);
        tx.send(dm("hello")).await.unwrap();
        drop(tx);
        let platform: BoxedPlatform = Arc::new(StubPlatform::default());
        assert_ok!(runtime.run_until(platform, rx, std::future::pending()).await);
        assert_eq!(*seen.lock(), 0);
    }

    #[tokio::test]
    async fn test_guild_events_reach_hooks_and_reporter() {
        let hooks = GatedHooks::default();
        let (reports, reporter) = reporter();
        let runtime = AginahRuntime::builder()
            .config(config())
            .guild_hooks(hooks.clone())
            .error_reporter(reporter)
            .build()
            .unwrap();

        let (tx, rx) = mpsc::channel(8);
        tx.send(Event::GuildJoined(guild(3))).await.unwrap();
        tx.send(Event::GuildLeft(guild(4))).await.unwrap();
        tx.send(Event::ConnectionError(ApiError::NotConnected))
            .await
            .unwrap();
        drop(tx);

        let platform: BoxedPlatform = Arc::new(StubPlatform::default());
        assert_ok!(runtime.run_until(platform, rx, std::future::pending()).await);

        let mut calls = hooks.calls.lock().clone();
        calls.sort();
        assert_eq!(calls, vec!["joined 3", "left 4"]);

        let mut reports = reports.lock().clone();
        reports.sort();
        assert_eq!(
            reports,
            vec![
                "Connection error: platform is not connected",
                "Guild hook `on_guild_left` failed: setup store offline",
            ]
        );
    }

    #[tokio::test]
    async fn test_unresolvable_event_is_reported() {
        let (reports, reporter) = reporter();
        let runtime = AginahRuntime::builder()
            .config(config())
            .error_reporter(reporter)
            .build()
            .unwrap();

        let (tx, rx) = mpsc::channel(8);
        tx.send(Event::ConnectionReady).await.unwrap();
        tx.send(Event::MessageReceived(MessageCreate {
            message: Partial::Ref(aginah_core::MessageRef {
                channel_id: ChannelId(50),
                message_id: MessageId(404),
            }),
            author: Partial::Ref(UserId(7)),
            member: None,
        }))
        .await
        .unwrap();
        drop(tx);

        let platform: BoxedPlatform = Arc::new(StubPlatform::default());
        assert_ok!(runtime.run_until(platform, rx, std::future::pending()).await);

        let reports = reports.lock();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].starts_with("Dispatch error: failed to resolve partial message"));
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let runtime = AginahRuntime::builder().config(config()).build().unwrap();
        let (_tx, rx) = mpsc::channel::<Event>(8);
        let platform: BoxedPlatform = Arc::new(StubPlatform::default());

        runtime.shutdown();
        assert_ok!(runtime.run_until(platform, rx, std::future::pending()).await);
        assert!(runtime.shutdown_token().is_cancelled());
    }

    #[tokio::test]
    async fn test_concurrent_run_is_rejected() {
        let runtime = AginahRuntime::builder().config(config()).build().unwrap();
        let platform: BoxedPlatform = Arc::new(StubPlatform::default());
        let (_tx1, rx1) = mpsc::channel::<Event>(1);
        let (_tx2, rx2) = mpsc::channel::<Event>(1);

        let first = runtime.run_until(platform.clone(), rx1, std::future::pending());
        tokio::pin!(first);
        let _ = tokio::time::timeout(Duration::from_millis(10), &mut first).await;

        let second = runtime
            .run_until(platform, rx2, std::future::ready(()))
            .await;
        assert!(matches!(second, Err(RuntimeError::AlreadyRunning)));

        runtime.shutdown();
        assert_ok!(first.await);
    }
}
