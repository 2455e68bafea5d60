// SQLite-backed store for settings, roles and user points.
//
// Tables:
// - settings: id, name, value
// - roles:    id, name, value
// - users:    discord_id, points
//
// Every operation checks a connection out of the pool, so concurrent command
// handlers never share a cursor. The pool itself sits behind a lock so the
// health supervisor can swap in a fresh one after an outage.

use crate::core::store::{HealthProbe, HealthStatus, StoreError};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Pool sizing and the wait limit for checking out a connection.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Clone)]
pub struct SqliteBotStore {
    pool: Arc<RwLock<SqlitePool>>,
    options: SqliteConnectOptions,
    settings: PoolSettings,
}

impl SqliteBotStore {
    /// Open (creating if needed) the database at `database_url` and run migrations.
    pub async fn new(database_url: &str, settings: PoolSettings) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Keep runtime databases in their own folder; SQLite won't create it for us.
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let pool = Self::connect(&options, &settings).await?;
        Self::migrate(&pool).await?;

        tracing::info!(
            database_url,
            max_connections = settings.max_connections,
            "SQLite store ready"
        );

        Ok(Self {
            pool: Arc::new(RwLock::new(pool)),
            options,
            settings,
        })
    }

    async fn connect(
        options: &SqliteConnectOptions,
        settings: &PoolSettings,
    ) -> Result<SqlitePool, sqlx::Error> {
        SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options.clone())
            .await
    }

    /// Create the tables if they don't exist yet.
    async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                value TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS roles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                value TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                discord_id INTEGER PRIMARY KEY,
                points INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Leaderboard reads sort on points
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_points ON users(points DESC)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Current pool handle. Cheap to clone; callers never hold the lock across a query.
    pub(crate) async fn pool(&self) -> SqlitePool {
        self.pool.read().await.clone()
    }

    #[cfg(test)]
    pub(crate) async fn close(&self) {
        self.pool().await.close().await;
    }
}

/// Sort driver errors into "can't reach the database" and "the statement failed".
pub(crate) fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Connectivity(err.to_string()),
        _ => StoreError::Query(err.to_string()),
    }
}

#[async_trait]
impl HealthProbe for SqliteBotStore {
    async fn health_check(&self) -> HealthStatus {
        let pool = self.pool().await;
        match sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&pool)
            .await
        {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => {
                let error = classify(e);
                tracing::error!(%error, "Database health check failed");
                HealthStatus::Unhealthy {
                    error: error.to_string(),
                }
            }
        }
    }

    async fn reconnect(&self) -> Result<(), StoreError> {
        let fresh = Self::connect(&self.options, &self.settings)
            .await
            .map_err(classify)?;
        Self::migrate(&fresh).await.map_err(classify)?;

        let stale = {
            let mut guard = self.pool.write().await;
            std::mem::replace(&mut *guard, fresh)
        };
        stale.close().await;

        tracing::info!("Database pool replaced");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) async fn temp_store() -> (tempfile::TempDir, SqliteBotStore) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("bot.db").display());
    let store = SqliteBotStore::new(&url, PoolSettings::default())
        .await
        .unwrap();
    (dir, store)
}
