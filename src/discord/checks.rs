// Framework-wide command check backed by the guard chain.

use crate::core::moderation::{ActorPermissions, CommandRequest, GuardDecision};
use crate::discord::embeds::error_embed;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Runs before every command. A denial is answered privately and the command
/// body never runs.
pub async fn command_check(ctx: Context<'_>) -> Result<bool, Error> {
    let command = ctx.command().qualified_name.clone();
    let request = CommandRequest {
        command: &command,
        in_guild: ctx.guild_id().is_some(),
        permissions: actor_permissions(ctx).await,
    };

    match ctx.data().guards.evaluate(&request) {
        GuardDecision::Allow => Ok(true),
        GuardDecision::Deny(reason) => {
            tracing::info!(
                user_id = ctx.author().id.get(),
                command = %command,
                "Command blocked by guard"
            );
            ctx.send(
                poise::CreateReply::default()
                    .embed(error_embed().description(reason))
                    .ephemeral(true),
            )
            .await?;
            Ok(false)
        }
    }
}

/// Permissions Discord resolved for the invoking member. Missing data means
/// no permissions.
async fn actor_permissions(ctx: Context<'_>) -> ActorPermissions {
    let permissions = ctx
        .author_member()
        .await
        .and_then(|member| member.permissions)
        .unwrap_or(serenity::Permissions::empty());

    ActorPermissions {
        administrator: permissions.administrator(),
        ban_members: permissions.ban_members(),
        moderate_members: permissions.moderate_members(),
        manage_guild: permissions.manage_guild(),
    }
}
