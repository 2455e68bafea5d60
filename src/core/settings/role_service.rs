// Role service - same lifecycle as settings, over the RoleStore port.

use super::settings_service::{validate_entry, validate_value};
use crate::core::store::{Role, RoleStore, StoreError};

pub struct RoleService<S: RoleStore> {
    store: S,
}

impl<S: RoleStore> RoleService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: i64) -> Result<Option<Role>, StoreError> {
        tracing::debug!(role_id = id, "Fetching role");
        self.store.get_role(id).await
    }

    pub async fn list(&self) -> Result<Vec<Role>, StoreError> {
        tracing::debug!("Fetching all roles");
        self.store.get_roles().await
    }

    pub async fn add(&self, name: &str, value: &str) -> Result<i64, StoreError> {
        let (name, value) = validate_entry(name, value)?;
        let id = self.store.add_role(name, value).await?;
        tracing::info!(role_id = id, role_name = name, value, "Role added");
        Ok(id)
    }

    pub async fn update(&self, id: i64, value: &str) -> Result<(), StoreError> {
        let value = validate_value(value)?;
        self.store.update_role(id, value).await?;
        tracing::info!(role_id = id, value, "Role updated");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete_role(id).await?;
        tracing::info!(role_id = id, "Role deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dashmap::DashMap;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Default)]
    struct MockRoleStore {
        rows: DashMap<i64, Role>,
        next_id: AtomicI64,
    }

    #[async_trait]
    impl RoleStore for MockRoleStore {
        async fn get_role(&self, id: i64) -> Result<Option<Role>, StoreError> {
            Ok(self.rows.get(&id).map(|r| r.clone()))
        }

        async fn get_roles(&self) -> Result<Vec<Role>, StoreError> {
            let mut rows: Vec<Role> = self.rows.iter().map(|r| r.value().clone()).collect();
            rows.sort_by_key(|r| r.id);
            Ok(rows)
        }

        async fn add_role(&self, name: &str, value: &str) -> Result<i64, StoreError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            self.rows.insert(
                id,
                Role {
                    id,
                    name: name.to_string(),
                    value: value.to_string(),
                },
            );
            Ok(id)
        }

        async fn update_role(&self, id: i64, value: &str) -> Result<(), StoreError> {
            let mut row = self
                .rows
                .get_mut(&id)
                .ok_or_else(|| StoreError::not_found("role", id))?;
            row.value = value.to_string();
            Ok(())
        }

        async fn delete_role(&self, id: i64) -> Result<(), StoreError> {
            self.rows
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| StoreError::not_found("role", id))
        }
    }

    #[tokio::test]
    async fn test_role_lifecycle() {
        let service = RoleService::new(MockRoleStore::default());

        let id = service.add("Staff", "2").await.unwrap();
        service.update(id, "3").await.unwrap();
        assert_eq!(service.get(id).await.unwrap().unwrap().value, "3");

        service.delete(id).await.unwrap();
        assert!(service.get(id).await.unwrap().is_none());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_role_name_is_validated() {
        let service = RoleService::new(MockRoleStore::default());
        let long_name = "r".repeat(super::super::settings_service::MAX_NAME_LEN + 1);

        assert!(matches!(
            service.add(&long_name, "1").await,
            Err(StoreError::Invalid(_))
        ));
    }
}
