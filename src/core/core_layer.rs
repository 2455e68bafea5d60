// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "health/mod.rs"]
pub mod health;

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "points/mod.rs"]
pub mod points;

#[path = "settings/mod.rs"]
pub mod settings;

#[path = "store/mod.rs"]
pub mod store;
