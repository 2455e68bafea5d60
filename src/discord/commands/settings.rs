// Slash commands for the settings table.

use crate::core::store::{Envelope, Setting, StoreError};
use crate::discord::embeds::{display_value, entries_embed, info_embed, reply_envelope, success_embed};
use crate::discord::{Context, Error};

/// View and edit bot settings.
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    subcommands("list", "logs", "get", "add", "update", "delete")
)]
pub async fn settings(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

fn setting_embed(title: &str, setting: &Setting) -> poise::serenity_prelude::CreateEmbed {
    info_embed()
        .title(title)
        .field("ID", setting.id.to_string(), true)
        .field("Name", &setting.name, true)
        .field("Value", display_value(&setting.value), false)
}

/// List every setting.
#[poise::command(slash_command, guild_only)]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let envelope = Envelope::from(ctx.data().settings.list().await);
    reply_envelope(ctx, envelope, |settings| {
        entries_embed(
            "Settings",
            settings
                .iter()
                .map(|s| (s.id, s.name.as_str(), s.value.as_str())),
        )
    })
    .await
}

/// List settings whose name contains "Log".
#[poise::command(slash_command, guild_only)]
pub async fn logs(ctx: Context<'_>) -> Result<(), Error> {
    let envelope = Envelope::from(ctx.data().settings.log_settings().await);
    reply_envelope(ctx, envelope, |settings| {
        entries_embed(
            "Log settings",
            settings
                .iter()
                .map(|s| (s.id, s.name.as_str(), s.value.as_str())),
        )
    })
    .await
}

/// Show one setting.
#[poise::command(slash_command, guild_only)]
pub async fn get(
    ctx: Context<'_>,
    #[description = "Setting ID"] id: i64,
) -> Result<(), Error> {
    let result = ctx
        .data()
        .settings
        .get(id)
        .await
        .and_then(|found| found.ok_or_else(|| StoreError::not_found("setting", id)));

    reply_envelope(ctx, Envelope::from(result), |setting| setting_embed("Setting", &setting)).await
}

/// Add a setting.
#[poise::command(slash_command, guild_only)]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Setting name"] name: String,
    #[description = "Setting value"] value: String,
) -> Result<(), Error> {
    let envelope = Envelope::from(ctx.data().settings.add(&name, &value).await);
    reply_envelope(ctx, envelope, |id| {
        success_embed().description(format!("Added setting **{}** as `#{}`.", name.trim(), id))
    })
    .await
}

/// Change a setting's value.
#[poise::command(slash_command, guild_only)]
pub async fn update(
    ctx: Context<'_>,
    #[description = "Setting ID"] id: i64,
    #[description = "New value"] value: String,
) -> Result<(), Error> {
    let envelope = Envelope::from(ctx.data().settings.update(id, &value).await);
    reply_envelope(ctx, envelope, |()| {
        success_embed().description(format!("Updated setting `#{}`.", id))
    })
    .await
}

/// Delete a setting.
#[poise::command(slash_command, guild_only)]
pub async fn delete(
    ctx: Context<'_>,
    #[description = "Setting ID"] id: i64,
) -> Result<(), Error> {
    let envelope = Envelope::from(ctx.data().settings.delete(id).await);
    reply_envelope(ctx, envelope, |()| {
        success_embed().description(format!("Deleted setting `#{}`.", id))
    })
    .await
}
