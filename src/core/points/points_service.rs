// Points system core - balances that only ever move by signed deltas.
//
// Users are created lazily with 0 points the first time they interact; after
// that the only writes are relative (`points += delta`) or a full removal.

use crate::core::store::{PointsStore, StoreError, UserPoints};

/// Fixed size of the leaderboard read. There is no pagination.
pub const LEADERBOARD_SIZE: u32 = 10;

/// Largest change a single award may make, in either direction.
pub const MAX_AWARD: i64 = 1_000_000;

pub struct PointsService<S: PointsStore> {
    store: S,
}

impl<S: PointsStore> PointsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Make sure a user has a row. Safe to call on every interaction.
    pub async fn register(&self, discord_id: u64) -> Result<bool, StoreError> {
        let created = self.store.add_user(discord_id).await?;
        if created {
            tracing::debug!(discord_id, "Registered user for points");
        }
        Ok(created)
    }

    /// Current balance, or `None` for a user who has never interacted.
    pub async fn balance(&self, discord_id: u64) -> Result<Option<i64>, StoreError> {
        self.store.get_points(discord_id).await
    }

    /// Apply a signed delta, registering the user first if needed.
    /// Returns the new balance.
    pub async fn award(&self, discord_id: u64, delta: i64) -> Result<i64, StoreError> {
        if !(-MAX_AWARD..=MAX_AWARD).contains(&delta) {
            return Err(StoreError::Invalid(format!(
                "A single award must be between -{} and {}",
                MAX_AWARD, MAX_AWARD
            )));
        }
        self.store.add_user(discord_id).await?;
        let total = self.store.update_points(discord_id, delta).await?;
        tracing::info!(discord_id, delta, total, "Points updated");
        Ok(total)
    }

    pub async fn remove(&self, discord_id: u64) -> Result<(), StoreError> {
        self.store.remove_user(discord_id).await?;
        tracing::info!(discord_id, "User removed from points");
        Ok(())
    }

    pub async fn top_10(&self) -> Result<Vec<UserPoints>, StoreError> {
        self.store.top_points(LEADERBOARD_SIZE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dashmap::DashMap;

    struct MockPointsStore {
        users: DashMap<u64, i64>,
    }

    impl MockPointsStore {
        fn new() -> Self {
            Self {
                users: DashMap::new(),
            }
        }
    }

    #[async_trait]
    impl PointsStore for MockPointsStore {
        async fn get_points(&self, discord_id: u64) -> Result<Option<i64>, StoreError> {
            Ok(self.users.get(&discord_id).map(|p| *p))
        }

        async fn add_user(&self, discord_id: u64) -> Result<bool, StoreError> {
            if self.users.contains_key(&discord_id) {
                return Ok(false);
            }
            self.users.insert(discord_id, 0);
            Ok(true)
        }

        async fn update_points(&self, discord_id: u64, delta: i64) -> Result<i64, StoreError> {
            let mut points = self
                .users
                .get_mut(&discord_id)
                .ok_or_else(|| StoreError::not_found("user", discord_id))?;
            *points = points
                .checked_add(delta)
                .ok_or_else(|| StoreError::Invalid(format!("{} + {} overflows", *points, delta)))?;
            Ok(*points)
        }

        async fn remove_user(&self, discord_id: u64) -> Result<(), StoreError> {
            self.users
                .remove(&discord_id)
                .map(|_| ())
                .ok_or_else(|| StoreError::not_found("user", discord_id))
        }

        async fn top_points(&self, limit: u32) -> Result<Vec<UserPoints>, StoreError> {
            let mut rows: Vec<UserPoints> = self
                .users
                .iter()
                .map(|e| UserPoints {
                    discord_id: *e.key(),
                    points: *e.value(),
                })
                .collect();
            rows.sort_by(|a, b| b.points.cmp(&a.points));
            rows.truncate(limit as usize);
            Ok(rows)
        }
    }

    #[tokio::test]
    async fn test_deltas_sum_from_zero() {
        let service = PointsService::new(MockPointsStore::new());

        for delta in [5, -3, 12, 0, -20] {
            service.award(1, delta).await.unwrap();
        }

        assert_eq!(service.balance(1).await.unwrap(), Some(-6));
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let service = PointsService::new(MockPointsStore::new());

        assert!(service.register(1).await.unwrap());
        service.award(1, 40).await.unwrap();

        // Second registration must not reset the balance
        assert!(!service.register(1).await.unwrap());
        assert_eq!(service.balance(1).await.unwrap(), Some(40));
    }

    #[tokio::test]
    async fn test_award_outside_bounds_is_rejected() {
        let service = PointsService::new(MockPointsStore::new());

        for delta in [MAX_AWARD + 1, -MAX_AWARD - 1, i64::MAX, i64::MIN] {
            assert!(matches!(
                service.award(3, delta).await,
                Err(StoreError::Invalid(_))
            ));
        }
        // Rejected before the user row is created
        assert_eq!(service.balance(3).await.unwrap(), None);

        assert_eq!(service.award(3, MAX_AWARD).await.unwrap(), MAX_AWARD);
        assert_eq!(service.award(3, -MAX_AWARD).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_overflowing_balance_is_kept() {
        let store = MockPointsStore::new();
        store.users.insert(3, i64::MAX - 1);
        let service = PointsService::new(store);

        assert!(matches!(
            service.award(3, 2).await,
            Err(StoreError::Invalid(_))
        ));
        assert_eq!(service.balance(3).await.unwrap(), Some(i64::MAX - 1));
        assert_eq!(service.award(3, 1).await.unwrap(), i64::MAX);
    }

    #[tokio::test]
    async fn test_remove_missing_user() {
        let service = PointsService::new(MockPointsStore::new());

        assert!(matches!(
            service.remove(404).await,
            Err(StoreError::NotFound { .. })
        ));

        service.register(404).await.unwrap();
        service.remove(404).await.unwrap();
        assert_eq!(service.balance(404).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_top_10_is_capped_and_sorted() {
        let service = PointsService::new(MockPointsStore::new());

        for user in 1..=15u64 {
            service.award(user, (user as i64 * 7) % 11).await.unwrap();
        }

        let top = service.top_10().await.unwrap();
        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].points >= w[1].points));
    }
}
