// SQLite implementation of the SettingsStore and RoleStore traits.
//
// Both tables have the same (id, name, value) shape, so the row mapping is
// shared. Updates and deletes check the affected-row count and report
// NotFound instead of silently succeeding.

use super::sqlite_store::{classify, SqliteBotStore};
use crate::core::store::{Role, RoleStore, Setting, SettingsStore, StoreError};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn row_to_setting(row: &SqliteRow) -> Result<Setting, StoreError> {
    Ok(Setting {
        id: row.try_get("id").map_err(classify)?,
        name: row.try_get("name").map_err(classify)?,
        value: row.try_get("value").map_err(classify)?,
    })
}

fn row_to_role(row: &SqliteRow) -> Result<Role, StoreError> {
    Ok(Role {
        id: row.try_get("id").map_err(classify)?,
        name: row.try_get("name").map_err(classify)?,
        value: row.try_get("value").map_err(classify)?,
    })
}

#[async_trait]
impl SettingsStore for SqliteBotStore {
    async fn get_setting(&self, id: i64) -> Result<Option<Setting>, StoreError> {
        let row = sqlx::query("SELECT id, name, value FROM settings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool().await)
            .await
            .map_err(classify)?;

        row.as_ref().map(row_to_setting).transpose()
    }

    async fn get_settings(&self) -> Result<Vec<Setting>, StoreError> {
        let rows = sqlx::query("SELECT id, name, value FROM settings ORDER BY id")
            .fetch_all(&self.pool().await)
            .await
            .map_err(classify)?;

        rows.iter().map(row_to_setting).collect()
    }

    async fn get_log_settings(&self) -> Result<Vec<Setting>, StoreError> {
        // GLOB is case-sensitive; LIKE would also match "loglevel"
        let rows = sqlx::query(
            "SELECT id, name, value FROM settings WHERE name GLOB '*Log*' ORDER BY id",
        )
        .fetch_all(&self.pool().await)
        .await
        .map_err(classify)?;

        rows.iter().map(row_to_setting).collect()
    }

    async fn add_setting(&self, name: &str, value: &str) -> Result<i64, StoreError> {
        let result = sqlx::query("INSERT INTO settings (name, value) VALUES (?, ?)")
            .bind(name)
            .bind(value)
            .execute(&self.pool().await)
            .await
            .map_err(classify)?;

        Ok(result.last_insert_rowid())
    }

    async fn update_setting(&self, id: i64, value: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE settings SET value = ? WHERE id = ?")
            .bind(value)
            .bind(id)
            .execute(&self.pool().await)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("setting", id));
        }
        Ok(())
    }

    async fn delete_setting(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM settings WHERE id = ?")
            .bind(id)
            .execute(&self.pool().await)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("setting", id));
        }
        Ok(())
    }
}

#[async_trait]
impl RoleStore for SqliteBotStore {
    async fn get_role(&self, id: i64) -> Result<Option<Role>, StoreError> {
        let row = sqlx::query("SELECT id, name, value FROM roles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool().await)
            .await
            .map_err(classify)?;

        row.as_ref().map(row_to_role).transpose()
    }

    async fn get_roles(&self) -> Result<Vec<Role>, StoreError> {
        let rows = sqlx::query("SELECT id, name, value FROM roles ORDER BY id")
            .fetch_all(&self.pool().await)
            .await
            .map_err(classify)?;

        rows.iter().map(row_to_role).collect()
    }

    async fn add_role(&self, name: &str, value: &str) -> Result<i64, StoreError> {
        let result = sqlx::query("INSERT INTO roles (name, value) VALUES (?, ?)")
            .bind(name)
            .bind(value)
            .execute(&self.pool().await)
            .await
            .map_err(classify)?;

        Ok(result.last_insert_rowid())
    }

    async fn update_role(&self, id: i64, value: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE roles SET value = ? WHERE id = ?")
            .bind(value)
            .bind(id)
            .execute(&self.pool().await)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("role", id));
        }
        Ok(())
    }

    async fn delete_role(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(id)
            .execute(&self.pool().await)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("role", id));
        }
        Ok(())
    }
}
