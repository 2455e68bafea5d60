// Discord commands module.
// Each feature gets its own command file.

pub mod health;

pub mod points;

pub mod roles;

pub mod settings;
