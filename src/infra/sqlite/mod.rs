// SQLite storage for settings, roles and points.
//
// One database, one pool; the trait impls for each table live in their own
// file next to the shared store.

pub mod points_store;
pub mod settings_store;
pub mod sqlite_store;

pub use sqlite_store::{PoolSettings, SqliteBotStore};
