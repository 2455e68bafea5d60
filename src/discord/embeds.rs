// Embed builders and the one place store outcomes become replies.

use crate::core::store::Envelope;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::fmt::Write;

pub struct Colors;

impl Colors {
    pub const SUCCESS: u32 = 0x00FF7F;
    pub const INFO: u32 = 0x5865F2;
    pub const WARNING: u32 = 0xFFD700;
    pub const ERROR: u32 = 0xFF4444;
    /// Public moderation notices.
    pub const NOTICE: u32 = 0xE02B2B;
}

fn base_embed(color: u32) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .color(color)
        .timestamp(serenity::Timestamp::now())
}

pub fn success_embed() -> serenity::CreateEmbed {
    base_embed(Colors::SUCCESS)
}

pub fn info_embed() -> serenity::CreateEmbed {
    base_embed(Colors::INFO)
}

pub fn warning_embed() -> serenity::CreateEmbed {
    base_embed(Colors::WARNING)
}

pub fn error_embed() -> serenity::CreateEmbed {
    base_embed(Colors::ERROR)
}

/// Red, timestamped record of a moderation action.
pub fn notice_embed(description: impl Into<String>) -> serenity::CreateEmbed {
    base_embed(Colors::NOTICE).description(description)
}

/// Embed fields can't be empty.
pub fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(empty)"
    } else {
        value
    }
}

/// List of `(id, name, value)` rows, one per line.
pub fn entries_embed<'a>(
    title: &str,
    entries: impl IntoIterator<Item = (i64, &'a str, &'a str)>,
) -> serenity::CreateEmbed {
    let mut body = String::new();
    for (id, name, value) in entries {
        let _ = writeln!(body, "`#{id}` **{name}**: {}", display_value(value));
    }
    if body.is_empty() {
        body.push_str("Nothing stored yet.");
    }
    // Discord caps descriptions at 4096 characters
    if body.chars().count() > 4000 {
        body = body.chars().take(4000).collect();
        body.push_str("\n...");
    }

    info_embed().title(title).description(body)
}

/// Send an `Ok` payload through `render`; report not-found and errors
/// privately to the invoker.
pub async fn reply_envelope<T>(
    ctx: Context<'_>,
    envelope: Envelope<T>,
    render: impl FnOnce(T) -> serenity::CreateEmbed,
) -> Result<(), Error> {
    let (embed, ephemeral) = match envelope {
        Envelope::Ok { payload } => (render(payload), false),
        Envelope::NotFound { message } => (warning_embed().title("Not found").description(message), true),
        Envelope::Error { message } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                %message,
                "Store operation failed"
            );
            (error_embed().title("Something went wrong").description(message), true)
        }
    };

    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .ephemeral(ephemeral),
    )
    .await?;
    Ok(())
}
