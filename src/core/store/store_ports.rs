// Storage ports for settings, roles and points.
//
// Same shape as the other store traits in core: async, Send + Sync, and every
// method returns a domain error instead of a driver error so the services
// never see sqlx.

use super::store_models::{HealthStatus, Role, Setting, UserPoints};
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The database could not be reached (I/O, pool exhausted or closed).
    #[error("Database unavailable: {0}")]
    Connectivity(String),

    /// The statement itself failed (bad SQL, decode error, constraint violation).
    #[error("Query failed: {0}")]
    Query(String),

    #[error("No {entity} found with ID {id}")]
    NotFound { entity: &'static str, id: String },

    /// Input rejected before it reached the database.
    #[error("Invalid input: {0}")]
    Invalid(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

// ============================================================================
// STORAGE TRAITS (PORTS)
// ============================================================================

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Look up one setting. A missing row is `Ok(None)`, not an error.
    async fn get_setting(&self, id: i64) -> Result<Option<Setting>, StoreError>;

    /// All settings in storage order.
    async fn get_settings(&self) -> Result<Vec<Setting>, StoreError>;

    /// Settings whose name contains `Log`, matched case-sensitively.
    async fn get_log_settings(&self) -> Result<Vec<Setting>, StoreError>;

    /// Insert a setting and return its new ID.
    async fn add_setting(&self, name: &str, value: &str) -> Result<i64, StoreError>;

    async fn update_setting(&self, id: i64, value: &str) -> Result<(), StoreError>;

    async fn delete_setting(&self, id: i64) -> Result<(), StoreError>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn get_role(&self, id: i64) -> Result<Option<Role>, StoreError>;

    async fn get_roles(&self) -> Result<Vec<Role>, StoreError>;

    async fn add_role(&self, name: &str, value: &str) -> Result<i64, StoreError>;

    async fn update_role(&self, id: i64, value: &str) -> Result<(), StoreError>;

    async fn delete_role(&self, id: i64) -> Result<(), StoreError>;
}

#[async_trait]
pub trait PointsStore: Send + Sync {
    async fn get_points(&self, discord_id: u64) -> Result<Option<i64>, StoreError>;

    /// Create the user with 0 points. Returns `false` if they already existed;
    /// an existing balance is never reset.
    async fn add_user(&self, discord_id: u64) -> Result<bool, StoreError>;

    /// Apply a signed delta and return the new balance.
    async fn update_points(&self, discord_id: u64, delta: i64) -> Result<i64, StoreError>;

    async fn remove_user(&self, discord_id: u64) -> Result<(), StoreError>;

    /// Highest balances first, at most `limit` rows.
    async fn top_points(&self, limit: u32) -> Result<Vec<UserPoints>, StoreError>;
}

#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn health_check(&self) -> HealthStatus;

    /// Replace the underlying connections with fresh ones.
    async fn reconnect(&self) -> Result<(), StoreError>;
}
