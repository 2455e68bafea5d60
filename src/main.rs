// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (SQLite)
// - `discord/` = Discord-specific adapters (commands, checks, moderation gateway)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Start the database health supervisor

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use crate::config::BotConfig;
use crate::core::health::{BackoffPolicy, HealthSupervisor};
use crate::core::moderation::{GuardChain, ModerationConfig, ModerationService};
use crate::core::points::PointsService;
use crate::core::settings::{RoleService, SettingsService};
use crate::discord::{Data, Error};
use crate::infra::sqlite::{PoolSettings, SqliteBotStore};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::GuildMemberAddition { new_member } = event {
        if !new_member.user.bot {
            let user_id = new_member.user.id.get();
            if let Err(e) = data.points.register(user_id).await {
                tracing::error!(user_id, error = %e, "Failed to register new member for points");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // One SQLite store backs every service; clones share the same pool.

    let store = SqliteBotStore::new(
        &config.database_url,
        PoolSettings {
            max_connections: config.max_connections,
            acquire_timeout: config.acquire_timeout,
        },
    )
    .await?;

    let data = Data {
        settings: Arc::new(SettingsService::new(store.clone())),
        roles: Arc::new(RoleService::new(store.clone())),
        points: Arc::new(PointsService::new(store.clone())),
        health: Arc::new(HealthSupervisor::new(store, BackoffPolicy::default())),
        moderation: Arc::new(ModerationService::new(ModerationConfig {
            appeal_contact: config.appeal_contact.clone(),
            request_timeout: config.request_timeout,
        })),
        guards: Arc::new(GuardChain::standard()),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    // GUILD_MEMBERS is privileged; it's needed for join events and member cache.
    let intents = serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_MEMBERS;

    let dev_guild_id = config.dev_guild_id;
    let health_interval = config.health_check_interval;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                discord::moderation::commands::ban(),
                discord::moderation::commands::mute(),
                discord::commands::settings::settings(),
                discord::commands::roles::roles(),
                discord::commands::points::points(),
                discord::commands::health::dbhealth(),
            ],
            command_check: Some(|ctx| Box::pin(discord::checks::command_check(ctx))),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            // Anyone who runs a command gets a points row
            post_command: |ctx| {
                Box::pin(async move {
                    let user_id = ctx.author().id.get();
                    if let Err(e) = ctx.data().points.register(user_id).await {
                        tracing::error!(user_id, error = %e, "Failed to register command author");
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!(bot = %ready.user.name, "Bot is starting up");

                match dev_guild_id {
                    Some(guild_id) => {
                        // Guild registration is instant; global can take up to an hour
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?;
                        tracing::info!(guild_id, "Commands registered in dev guild");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        tracing::info!("Commands registered globally");
                    }
                }

                // Background database supervisor
                let health = Arc::clone(&data.health);
                tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(health_interval);
                    // The first tick fires immediately; the store was just opened
                    ticker.tick().await;
                    loop {
                        ticker.tick().await;
                        let status = health.ensure_healthy().await;
                        tracing::debug!(%status, "Periodic database health check");
                    }
                });

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}
