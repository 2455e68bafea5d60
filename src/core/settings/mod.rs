// Settings and roles - two independent key/value tables with the same lifecycle.

pub mod role_service;
pub mod settings_service;

pub use role_service::RoleService;
pub use settings_service::SettingsService;
