// Serenity-backed `ModerationGateway`. Translates core moderation calls into
// Discord API calls for one command invocation.
//
// The interaction itself is only ever answered privately. The deferral is
// ephemeral, so every followup (confirmation or error) stays ephemeral too;
// the public notice goes to the channel as a plain message.

use crate::core::moderation::{ModerationError, ModerationGateway, ModerationTarget};
use crate::discord::embeds::{error_embed, notice_embed, success_embed};
use crate::discord::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;

pub struct PoiseModerationGateway<'a> {
    ctx: Context<'a>,
    guild_id: serenity::GuildId,
    member: &'a serenity::Member,
}

/// Private confirmation that resolves the deferred response.
fn confirmation_reply() -> poise::CreateReply {
    poise::CreateReply::default()
        .embed(success_embed().description("Done."))
        .ephemeral(true)
}

fn refusal_reply(content: String) -> poise::CreateReply {
    poise::CreateReply::default()
        .embed(error_embed().description(content))
        .ephemeral(true)
}

impl<'a> PoiseModerationGateway<'a> {
    pub fn new(ctx: Context<'a>, guild_id: serenity::GuildId, member: &'a serenity::Member) -> Self {
        Self {
            ctx,
            guild_id,
            member,
        }
    }
}

#[async_trait]
impl ModerationGateway for PoiseModerationGateway<'_> {
    async fn acknowledge(&self) -> Result<(), ModerationError> {
        self.ctx
            .defer_ephemeral()
            .await
            .map_err(|e| ModerationError::platform("defer response", e))
    }

    async fn send_direct_message(
        &self,
        _target: &ModerationTarget,
        content: String,
    ) -> Result<(), ModerationError> {
        self.member
            .user
            .direct_message(
                self.ctx.serenity_context(),
                serenity::CreateMessage::new().content(content),
            )
            .await
            .map(|_| ())
            .map_err(|e| ModerationError::platform("send direct message", e))
    }

    async fn ban(
        &self,
        _target: &ModerationTarget,
        audit_reason: String,
    ) -> Result<(), ModerationError> {
        self.guild_id
            .ban_with_reason(self.ctx.http(), self.member.user.id, 0, &audit_reason)
            .await
            .map_err(|e| ModerationError::platform("ban member", e))
    }

    async fn timeout_until(
        &self,
        _target: &ModerationTarget,
        until: DateTime<Utc>,
        audit_reason: String,
    ) -> Result<(), ModerationError> {
        let until = serenity::Timestamp::from_unix_timestamp(until.timestamp())
            .map_err(|e| ModerationError::platform("timeout member", e))?;

        self.guild_id
            .edit_member(
                self.ctx.http(),
                self.member.user.id,
                serenity::EditMember::new()
                    .disable_communication_until_datetime(until)
                    .audit_log_reason(&audit_reason),
            )
            .await
            .map(|_| ())
            .map_err(|e| ModerationError::platform("timeout member", e))
    }

    async fn announce(&self, content: String) -> Result<(), ModerationError> {
        self.ctx
            .channel_id()
            .send_message(
                self.ctx.http(),
                serenity::CreateMessage::new().embed(notice_embed(content)),
            )
            .await
            .map_err(|e| ModerationError::platform("post announcement", e))?;

        // Resolves the deferred response; otherwise it keeps "thinking"
        self.ctx
            .send(confirmation_reply())
            .await
            .map(|_| ())
            .map_err(|e| ModerationError::platform("confirm action", e))
    }

    async fn refuse(&self, content: String) -> Result<(), ModerationError> {
        self.ctx
            .send(refusal_reply(content))
            .await
            .map(|_| ())
            .map_err(|e| ModerationError::platform("send refusal", e))
    }
}
