// Ban and mute slash commands.
//
// Thin on purpose: build the moderator/target records from Discord types,
// hand them to `ModerationService::execute`, report failures privately.

use super::gateway::PoiseModerationGateway;
use crate::core::moderation::{ModerationAction, ModerationOutcome, ModerationTarget, Moderator};
use crate::discord::embeds::error_embed;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Ban a member from the server.
#[poise::command(slash_command, guild_only, default_member_permissions = "BAN_MEMBERS")]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "Member to ban"] target: serenity::Member,
    #[description = "Why they are being banned"] reason: String,
) -> Result<(), Error> {
    moderate(ctx, &target, ModerationAction::Ban { reason }).await
}

/// Time a member out for a number of minutes.
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "MODERATE_MEMBERS"
)]
pub async fn mute(
    ctx: Context<'_>,
    #[description = "Member to mute"] target: serenity::Member,
    #[description = "Duration in minutes (max 28 days)"]
    #[min = 1]
    #[max = 40320]
    minutes: u32,
    #[description = "Why they are being muted"] reason: String,
) -> Result<(), Error> {
    moderate(ctx, &target, ModerationAction::Mute { minutes, reason }).await
}

async fn moderate(
    ctx: Context<'_>,
    member: &serenity::Member,
    action: ModerationAction,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command only works in servers.")?;

    let moderator = Moderator {
        user_id: ctx.author().id.get(),
        name: ctx.author().name.clone(),
    };
    let target = ModerationTarget {
        user_id: member.user.id.get(),
        name: member.user.name.clone(),
        is_bot: member.user.bot,
        is_admin: is_admin(ctx, guild_id, member),
    };

    let gateway = PoiseModerationGateway::new(ctx, guild_id, member);
    match ctx
        .data()
        .moderation
        .execute(&gateway, &moderator, &target, &action)
        .await
    {
        Ok(ModerationOutcome::Applied { notified, .. }) => {
            if !notified {
                tracing::debug!(target_id = target.user_id, "Target had direct messages closed");
            }
        }
        Ok(ModerationOutcome::Refused(_)) => {}
        Err(e) => {
            tracing::error!(
                moderator_id = moderator.user_id,
                target_id = target.user_id,
                action = action.verb(),
                error = %e,
                "Moderation action failed"
            );
            ctx.send(
                poise::CreateReply::default()
                    .embed(
                        error_embed()
                            .description(format!("Could not {} **{}**: {}", action.verb(), target.name, e)),
                    )
                    .ephemeral(true),
            )
            .await?;
        }
    }

    Ok(())
}

/// Whether the target holds Administrator in this guild. When the guild isn't
/// cached the answer is "yes", so the action is refused rather than risked.
fn is_admin(ctx: Context<'_>, guild_id: serenity::GuildId, member: &serenity::Member) -> bool {
    match ctx.cache().guild(guild_id) {
        Some(guild) => guild.member_permissions(member).administrator(),
        None => {
            tracing::warn!(guild_id = guild_id.get(), "Guild not cached; treating target as admin");
            true
        }
    }
}
