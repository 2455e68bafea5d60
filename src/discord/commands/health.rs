// Database health command.

use crate::core::store::HealthStatus;
use crate::discord::embeds::{error_embed, success_embed};
use crate::discord::{Context, Error};

/// Probe the database and show the result.
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn dbhealth(ctx: Context<'_>) -> Result<(), Error> {
    let status = ctx.data().health.check().await;

    let embed = match &status {
        HealthStatus::Healthy => success_embed()
            .title("Database health")
            .description("The database is reachable."),
        HealthStatus::Unhealthy { error } => error_embed()
            .title("Database health")
            .description(format!("The database is unreachable.\n```{}```", error))
            .field(
                "Recovery",
                "The background supervisor will try to reconnect.",
                false,
            ),
    };

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}
