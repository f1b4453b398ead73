//! Console Bot
//!
//! An Aginah bot whose "server" is your terminal. Type messages, prefixed
//! commands (`!help`, `!roll 2d6`, `!ban someone`) or console commands
//! (`:admin`, `:role moderator`, `:react 👍`, `:voice`) and watch the
//! dispatcher route them.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package console-bot -- --dev
//! ```

mod handlers;
mod platform;

use std::path::PathBuf;
use std::sync::Arc;

use aginah::prelude::*;
use aginah::runtime::RuntimeBuilder;
use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::platform::{CONSOLE_HELP, ConsolePlatform, Input};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Development mode: debug logging
    #[arg(long)]
    dev: bool,

    /// Configuration file (defaults to aginah.toml in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Command prefix, overriding the configuration
    #[arg(short, long)]
    prefix: Option<String>,

    /// Your display name
    #[arg(short, long, default_value = "you")]
    name: String,
}

/// Logs guild lifecycle instead of persisting guild setups.
struct LoggedSetups;

#[async_trait]
impl GuildHooks for LoggedSetups {
    async fn on_guild_joined(&self, _platform: &BoxedPlatform, guild: &Guild) -> HandlerResult {
        info!(guild = %guild.name, "Creating default setup");
        Ok(())
    }

    async fn verify_guild_setups(&self, platform: &BoxedPlatform) -> HandlerResult {
        for guild in platform.guilds().await? {
            info!(guild = %guild.name, "Setup verified");
        }
        Ok(())
    }
}

fn runtime_builder(args: &Args) -> RuntimeBuilder {
    let mut builder = AginahRuntime::builder()
        // The console needs no credential.
        .set("token", "console")
        .install_all(handlers::MANIFEST)
        .guild_hooks(LoggedSetups);
    if let Some(path) = &args.config {
        builder = builder.config_file(path);
    }
    if args.dev {
        builder = builder.set("dev_mode", true);
    }
    if let Some(prefix) = &args.prefix {
        builder = builder.set("command_prefix", prefix);
    }
    builder
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let runtime = runtime_builder(&args).build()?;
    let console = Arc::new(ConsolePlatform::new(&args.name));
    let (tx, rx) = mpsc::channel(64);

    println!("{CONSOLE_HELP}");
    println!("bot commands start with `{}`", runtime.config().command_prefix);

    tx.send(Event::GuildJoined(console.guild())).await?;
    tx.send(Event::ConnectionReady).await?;

    let reader = console.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "Failed to read stdin");
                    break;
                }
            };
            match reader.translate(&line) {
                Some(Input::Event(event)) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Some(Input::Console(text)) => println!("{text}"),
                Some(Input::Quit) => break,
                None => {}
            }
        }
        // Dropping the sender lets the runtime finish in-flight events and stop.
    });

    runtime.run(console, rx).await?;
    Ok(())
}
