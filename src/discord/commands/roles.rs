// Slash commands for the roles table.

use crate::core::store::{Envelope, Role, StoreError};
use crate::discord::embeds::{display_value, entries_embed, info_embed, reply_envelope, success_embed};
use crate::discord::{Context, Error};

/// View and edit role entries.
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    subcommands("list", "get", "add", "update", "delete")
)]
pub async fn roles(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

fn role_embed(title: &str, role: &Role) -> poise::serenity_prelude::CreateEmbed {
    info_embed()
        .title(title)
        .field("ID", role.id.to_string(), true)
        .field("Name", &role.name, true)
        .field("Value", display_value(&role.value), false)
}

/// List every role entry.
#[poise::command(slash_command, guild_only)]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let envelope = Envelope::from(ctx.data().roles.list().await);
    reply_envelope(ctx, envelope, |roles| {
        entries_embed(
            "Roles",
            roles
                .iter()
                .map(|r| (r.id, r.name.as_str(), r.value.as_str())),
        )
    })
    .await
}

/// Show one role entry.
#[poise::command(slash_command, guild_only)]
pub async fn get(
    ctx: Context<'_>,
    #[description = "Role ID"] id: i64,
) -> Result<(), Error> {
    let result = ctx
        .data()
        .roles
        .get(id)
        .await
        .and_then(|found| found.ok_or_else(|| StoreError::not_found("role", id)));

    reply_envelope(ctx, Envelope::from(result), |role| role_embed("Role", &role)).await
}

/// Add a role entry.
#[poise::command(slash_command, guild_only)]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Role name"] name: String,
    #[description = "Role value"] value: String,
) -> Result<(), Error> {
    let envelope = Envelope::from(ctx.data().roles.add(&name, &value).await);
    reply_envelope(ctx, envelope, |id| {
        success_embed().description(format!("Added role **{}** as `#{}`.", name.trim(), id))
    })
    .await
}

/// Change a role entry's value.
#[poise::command(slash_command, guild_only)]
pub async fn update(
    ctx: Context<'_>,
    #[description = "Role ID"] id: i64,
    #[description = "New value"] value: String,
) -> Result<(), Error> {
    let envelope = Envelope::from(ctx.data().roles.update(id, &value).await);
    reply_envelope(ctx, envelope, |()| {
        success_embed().description(format!("Updated role `#{}`.", id))
    })
    .await
}

/// Delete a role entry.
#[poise::command(slash_command, guild_only)]
pub async fn delete(
    ctx: Context<'_>,
    #[description = "Role ID"] id: i64,
) -> Result<(), Error> {
    let envelope = Envelope::from(ctx.data().roles.delete(id).await);
    reply_envelope(ctx, envelope, |()| {
        success_embed().description(format!("Deleted role `#{}`.", id))
    })
    .await
}
