// Slash commands for user points.
//
// Anyone can check balances and the leaderboard; give/remove are gated to
// server managers by the guard chain.

use crate::core::store::{Envelope, StoreError};
use crate::discord::embeds::{info_embed, reply_envelope, success_embed};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::fmt::Write;

/// Points balances and the leaderboard.
#[poise::command(
    slash_command,
    guild_only,
    subcommands("balance", "leaderboard", "give", "remove")
)]
pub async fn points(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Show a user's points (defaults to you).
#[poise::command(slash_command, guild_only)]
pub async fn balance(
    ctx: Context<'_>,
    #[description = "User to check"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let user = user.as_ref().unwrap_or_else(|| ctx.author());
    let discord_id = user.id.get();

    let result = ctx
        .data()
        .points
        .balance(discord_id)
        .await
        .and_then(|found| found.ok_or_else(|| StoreError::not_found("user", discord_id)));

    reply_envelope(ctx, Envelope::from(result), |points| {
        info_embed()
            .title(format!("Points for {}", user.name))
            .thumbnail(user.face())
            .description(format!("**{}** points", points))
    })
    .await
}

/// Top 10 users by points.
#[poise::command(slash_command, guild_only)]
pub async fn leaderboard(ctx: Context<'_>) -> Result<(), Error> {
    let envelope = Envelope::from(ctx.data().points.top_10().await);

    reply_envelope(ctx, envelope, |top| {
        let mut body = String::new();
        for (rank, entry) in top.iter().enumerate() {
            let _ = writeln!(
                body,
                "**{}.** <@{}>: {} points",
                rank + 1,
                entry.discord_id,
                entry.points
            );
        }
        if body.is_empty() {
            body.push_str("Nobody has any points yet.");
        }
        info_embed().title("Points leaderboard").description(body)
    })
    .await
}

/// Add (or with a negative amount, take) points.
#[poise::command(slash_command, guild_only)]
pub async fn give(
    ctx: Context<'_>,
    #[description = "User to award"] user: serenity::User,
    #[description = "Points to add (negative to subtract), at most 1,000,000 either way"]
    amount: i64,
) -> Result<(), Error> {
    if user.bot {
        ctx.send(
            poise::CreateReply::default()
                .content("Bots don't collect points.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let envelope = Envelope::from(ctx.data().points.award(user.id.get(), amount).await);
    reply_envelope(ctx, envelope, |total| {
        success_embed().description(format!(
            "Gave **{}** points to <@{}>. New balance: **{}**.",
            amount, user.id, total
        ))
    })
    .await
}

/// Delete a user's points record.
#[poise::command(slash_command, guild_only)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "User to remove"] user: serenity::User,
) -> Result<(), Error> {
    let envelope = Envelope::from(ctx.data().points.remove(user.id.get()).await);
    reply_envelope(ctx, envelope, |()| {
        success_embed().description(format!("Removed <@{}> from the points table.", user.id))
    })
    .await
}
