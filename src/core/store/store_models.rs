// Store domain models - plain records for the three tables the bot owns.
//
// No database or Discord types here. The infra layer maps rows into these
// and the Discord layer renders them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named configuration value. Names are not guaranteed to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub id: i64,
    pub name: String,
    pub value: String,
}

/// A named role entry. `value` is free-form (usually a permission level or a role ID).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub value: String,
}

/// A user's point balance, keyed by their Discord user ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPoints {
    pub discord_id: u64,
    pub points: i64,
}

/// Result of probing the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy { error: String },
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Unhealthy { error } => write!(f, "unhealthy ({})", error),
        }
    }
}
