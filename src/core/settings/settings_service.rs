// Settings service - validation and logging around the SettingsStore port.
//
// Platform-agnostic: the Discord layer hands in primitives and renders
// whatever comes back.

use crate::core::store::{Setting, SettingsStore, StoreError};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_VALUE_LEN: usize = 1000;

/// Trim and bound-check a name/value pair before it is written.
pub(crate) fn validate_entry<'a>(
    name: &'a str,
    value: &'a str,
) -> Result<(&'a str, &'a str), StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Invalid("Name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(StoreError::Invalid(format!(
            "Name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    validate_value(value).map(|value| (name, value))
}

pub(crate) fn validate_value(value: &str) -> Result<&str, StoreError> {
    if value.chars().count() > MAX_VALUE_LEN {
        return Err(StoreError::Invalid(format!(
            "Value must be at most {} characters",
            MAX_VALUE_LEN
        )));
    }
    Ok(value)
}

pub struct SettingsService<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> SettingsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: i64) -> Result<Option<Setting>, StoreError> {
        tracing::debug!(setting_id = id, "Fetching setting");
        self.store.get_setting(id).await
    }

    pub async fn list(&self) -> Result<Vec<Setting>, StoreError> {
        tracing::debug!("Fetching all settings");
        self.store.get_settings().await
    }

    /// Settings whose name contains "Log" (case-sensitive).
    pub async fn log_settings(&self) -> Result<Vec<Setting>, StoreError> {
        tracing::debug!("Fetching log settings");
        self.store.get_log_settings().await
    }

    pub async fn add(&self, name: &str, value: &str) -> Result<i64, StoreError> {
        let (name, value) = validate_entry(name, value)?;
        let id = self.store.add_setting(name, value).await?;
        tracing::info!(setting_id = id, setting_name = name, value, "Setting added");
        Ok(id)
    }

    pub async fn update(&self, id: i64, value: &str) -> Result<(), StoreError> {
        let value = validate_value(value)?;
        self.store.update_setting(id, value).await?;
        tracing::info!(setting_id = id, value, "Setting updated");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete_setting(id).await?;
        tracing::info!(setting_id = id, "Setting deleted");
        Ok(())
    }
}
