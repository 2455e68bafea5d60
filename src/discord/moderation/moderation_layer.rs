// Discord side of moderation: the slash commands and the gateway that
// carries out the platform calls for the core flow.

pub mod commands;
pub mod gateway;
