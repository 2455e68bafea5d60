// The infra module contains implementations of core traits.
// Each backend gets its own submodule.

#[path = "sqlite/mod.rs"]
pub mod sqlite;
