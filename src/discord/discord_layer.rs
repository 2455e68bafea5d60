// Discord layer - commands, checks and the platform side of moderation.

#[path = "commands/command_catalog.rs"]
pub mod commands;

pub mod checks;
pub mod embeds;

#[path = "moderation/moderation_layer.rs"]
pub mod moderation;

use crate::core::health::HealthSupervisor;
use crate::core::moderation::{GuardChain, ModerationService};
use crate::core::points::PointsService;
use crate::core::settings::{RoleService, SettingsService};
use crate::infra::sqlite::SqliteBotStore;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Shared state handed to every command.
pub struct Data {
    pub settings: Arc<SettingsService<SqliteBotStore>>,
    pub roles: Arc<RoleService<SqliteBotStore>>,
    pub points: Arc<PointsService<SqliteBotStore>>,
    pub health: Arc<HealthSupervisor<SqliteBotStore>>,
    pub moderation: Arc<ModerationService>,
    pub guards: Arc<GuardChain>,
}
