//! Commands and listeners of the console bot.

use aginah::prelude::*;
use rand::Rng;
use tracing::info;

/// Every handler module of the bot, in load order.
pub static MANIFEST: &[Registration] = &[
    Registration::Category(general),
    Registration::Category(moderation),
    Registration::MessageListener(greeting),
    Registration::ReactionListener(reaction_log),
    Registration::VoiceStateListener(voice_log),
];

// ============================================================================
// General
// ============================================================================

fn general() -> CommandCategory {
    CommandCategory::new("General")
        .description("Commands anyone can use anywhere")
        .command(
            Command::new("help", help)
                .alias("commands")
                .description("Lists commands, or explains one")
                .usage("[command]"),
        )
        .command(
            Command::new("roll", roll)
                .alias("r")
                .description("Rolls dice")
                .usage("[count]d<sides>"),
        )
}

async fn help(ctx: InvocationContext, args: Vec<String>) -> HandlerResult {
    let registry = ctx.registry();

    let text = match args.first() {
        Some(name) => match registry.lookup(&name.to_lowercase()) {
            Some(command) => {
                let mut text = format!("{} {}", command.name(), command.get_usage());
                if !command.alias_names().is_empty() {
                    text.push_str(&format!(" (aliases: {})", command.alias_names().join(", ")));
                }
                text.push_str(&format!("\n  {}", command.get_description()));
                text
            }
            None => format!("No command named `{name}`."),
        },
        None => {
            let mut text = String::from("Commands:");
            for category in registry.categories() {
                text.push_str(&format!("\n{}", category.name()));
                for command in category.commands() {
                    text.push_str(&format!(
                        "\n  {:<8} {}",
                        command.name(),
                        command.get_description()
                    ));
                }
            }
            text
        }
    };

    ctx.send(&text).await?;
    Ok(())
}

/// Parses `NdM`, `dM` or `M`.
fn parse_dice(spec: &str) -> Result<(u32, u32), BoxError> {
    let (count, sides): (u32, u32) = match spec.split_once('d') {
        Some(("", sides)) => (1, sides.parse()?),
        Some((count, sides)) => (count.parse()?, sides.parse()?),
        None => (1, spec.parse()?),
    };
    if !(1..=100).contains(&count) || !(2..=1000).contains(&sides) {
        return Err(format!("cannot roll {count}d{sides}").into());
    }
    Ok((count, sides))
}

async fn roll(ctx: InvocationContext, args: Vec<String>) -> HandlerResult {
    let (count, sides) = parse_dice(args.first().map_or("1d6", String::as_str))?;
    let rolls: Vec<u32> = {
        let mut rng = rand::thread_rng();
        (0..count).map(|_| rng.gen_range(1..=sides)).collect()
    };
    let total: u32 = rolls.iter().sum();

    let shown: Vec<String> = rolls.iter().map(u32::to_string).collect();
    ctx.reply(&format!("{count}d{sides}: {} = {total}", shown.join(" + ")))
        .await?;
    Ok(())
}

// ============================================================================
// Moderation
// ============================================================================

fn moderation() -> CommandCategory {
    CommandCategory::new("Moderation")
        .description("Server moderation")
        .command(
            Command::new("ban", ban)
                .guild_only()
                .admin_only()
                .description("Bans a member")
                .usage("<member>"),
        )
        .command(
            Command::new("mute", mute)
                .alias("silence")
                .guild_only()
                .minimum_role("moderator")
                .description("Mutes a member")
                .usage("<member>"),
        )
}

async fn ban(ctx: InvocationContext, args: Vec<String>) -> HandlerResult {
    let Some(target) = args.first() else {
        ctx.reply("Who should I ban?").await?;
        return Ok(());
    };
    ctx.send(&format!("{target} has been banned.")).await?;
    Ok(())
}

async fn mute(ctx: InvocationContext, args: Vec<String>) -> HandlerResult {
    let Some(target) = args.first() else {
        ctx.reply("Who should I mute?").await?;
        return Ok(());
    };
    ctx.send(&format!("{target} has been muted.")).await?;
    Ok(())
}

// ============================================================================
// Listeners
// ============================================================================

fn greeting() -> MessageListener {
    Listener::new("greeting", |ctx: InvocationContext| async move {
        let content = ctx.content().to_lowercase();
        if content.starts_with("hello") || content.starts_with("hi ") || content == "hi" {
            ctx.send(&format!("Hello, {}!", ctx.author().name)).await?;
        }
        Ok::<(), BoxError>(())
    })
}

fn reaction_log() -> ReactionListener {
    Listener::new("reaction_log", |ctx: ReactionContext| async move {
        info!(
            emoji = %ctx.reaction().emoji,
            user = %ctx.user_id(),
            message_id = %ctx.message().id,
            added = ctx.added(),
            "Reaction"
        );
    })
}

fn voice_log() -> VoiceStateListener {
    Listener::new("voice_log", |ctx: VoiceStateContext| async move {
        let name = &ctx.new_member().user.name;
        if ctx.joined() {
            info!(member = %name, "Joined voice");
        } else if ctx.left() {
            info!(member = %name, "Left voice");
        }
    })
}
