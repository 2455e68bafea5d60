// Moderation domain models - data structures for ban and mute.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer converts members into `ModerationTarget`s and carries out
// the actions through a `ModerationGateway`.

use chrono::{DateTime, Utc};
use std::fmt;

/// Longest timeout the platform accepts: 28 days.
pub const MAX_MUTE_MINUTES: u32 = 28 * 24 * 60;

/// Audit log reasons longer than this are rejected by the platform.
pub const MAX_AUDIT_REASON_LEN: usize = 512;

/// What the moderator asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum ModerationAction {
    /// Permanent removal from the guild
    Ban { reason: String },
    /// Timed communication restriction
    Mute { minutes: u32, reason: String },
}

impl ModerationAction {
    /// Imperative verb used in refusals ("You can't ban a bot.").
    pub fn verb(&self) -> &'static str {
        match self {
            ModerationAction::Ban { .. } => "ban",
            ModerationAction::Mute { .. } => "mute",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            ModerationAction::Ban { .. } => "banned",
            ModerationAction::Mute { .. } => "muted",
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ModerationAction::Ban { reason } | ModerationAction::Mute { reason, .. } => reason,
        }
    }
}

/// The invoking moderator.
#[derive(Debug, Clone, PartialEq)]
pub struct Moderator {
    pub user_id: u64,
    pub name: String,
}

/// The member being acted on, reduced to what the eligibility gate needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationTarget {
    pub user_id: u64,
    pub name: String,
    pub is_bot: bool,
    pub is_admin: bool,
}

/// Why an action was refused. Shown to the moderator only; nothing is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Refusal {
    TargetIsBot { verb: &'static str },
    TargetIsAdmin { verb: &'static str },
    InvalidDuration { minutes: u32 },
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refusal::TargetIsBot { verb } => write!(f, "You can't {} a bot.", verb),
            Refusal::TargetIsAdmin { verb } => write!(f, "You can't {} an Admin.", verb),
            Refusal::InvalidDuration { minutes } => write!(
                f,
                "Mute duration must be between 1 and {} minutes (got {}).",
                MAX_MUTE_MINUTES, minutes
            ),
        }
    }
}

/// Result of running a moderation command to completion.
#[derive(Debug, Clone, PartialEq)]
pub enum ModerationOutcome {
    /// The action was applied and announced.
    Applied {
        announcement: String,
        /// Only set for mutes
        expires_at: Option<DateTime<Utc>>,
        /// Whether the target's direct message went through
        notified: bool,
    },
    /// The eligibility gate stopped the action.
    Refused(Refusal),
}

/// Settings for the moderation flow.
#[derive(Debug, Clone)]
pub struct ModerationConfig {
    /// Where banned users are told to appeal.
    pub appeal_contact: String,
    /// Upper bound on every outbound platform call.
    pub request_timeout: std::time::Duration,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            appeal_contact: "the server staff".to_string(),
            request_timeout: std::time::Duration::from_secs(10),
        }
    }
}
