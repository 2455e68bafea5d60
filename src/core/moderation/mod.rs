// Core moderation module - ban/mute flow and the pre-dispatch guard chain.
// Pure domain logic; the Discord layer supplies the gateway and permissions.

pub mod command_guards;
pub mod moderation_models;
pub mod moderation_service;

pub use command_guards::*;
pub use moderation_models::*;
pub use moderation_service::*;
