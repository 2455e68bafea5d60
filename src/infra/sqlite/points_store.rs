// SQLite implementation of the PointsStore trait.

use super::sqlite_store::{classify, SqliteBotStore};
use crate::core::store::{PointsStore, StoreError, UserPoints};
use async_trait::async_trait;
use sqlx::Row;

#[async_trait]
impl PointsStore for SqliteBotStore {
    async fn get_points(&self, discord_id: u64) -> Result<Option<i64>, StoreError> {
        let row = sqlx::query("SELECT points FROM users WHERE discord_id = ?")
            .bind(discord_id as i64)
            .fetch_optional(&self.pool().await)
            .await
            .map_err(classify)?;

        row.map(|r| r.try_get::<i64, _>("points"))
            .transpose()
            .map_err(classify)
    }

    async fn add_user(&self, discord_id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (discord_id, points)
            VALUES (?, 0)
            ON CONFLICT(discord_id) DO NOTHING
            "#,
        )
        .bind(discord_id as i64)
        .execute(&self.pool().await)
        .await
        .map_err(classify)?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_points(&self, discord_id: u64, delta: i64) -> Result<i64, StoreError> {
        let pool = self.pool().await;
        // Dropping the transaction without commit rolls it back
        let mut tx = pool.begin().await.map_err(classify)?;

        let row = sqlx::query("SELECT points FROM users WHERE discord_id = ?")
            .bind(discord_id as i64)
            .fetch_optional(&mut *tx)
            .await
            .map_err(classify)?;

        let Some(row) = row else {
            return Err(StoreError::not_found("user", discord_id));
        };
        let current: i64 = row.try_get("points").map_err(classify)?;

        // SQLite silently promotes an overflowing integer to REAL
        let total = current.checked_add(delta).ok_or_else(|| {
            StoreError::Invalid(format!(
                "Adding {} to a balance of {} is out of range",
                delta, current
            ))
        })?;

        sqlx::query("UPDATE users SET points = ? WHERE discord_id = ?")
            .bind(total)
            .bind(discord_id as i64)
            .execute(&mut *tx)
            .await
            .map_err(classify)?;

        tx.commit().await.map_err(classify)?;
        Ok(total)
    }

    async fn remove_user(&self, discord_id: u64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE discord_id = ?")
            .bind(discord_id as i64)
            .execute(&self.pool().await)
            .await
            .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user", discord_id));
        }
        Ok(())
    }

    async fn top_points(&self, limit: u32) -> Result<Vec<UserPoints>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT discord_id, points
            FROM users
            ORDER BY points DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool().await)
        .await
        .map_err(classify)?;

        rows.iter()
            .map(|row| {
                Ok(UserPoints {
                    discord_id: row.try_get::<i64, _>("discord_id").map_err(classify)? as u64,
                    points: row.try_get("points").map_err(classify)?,
                })
            })
            .collect()
    }
}
