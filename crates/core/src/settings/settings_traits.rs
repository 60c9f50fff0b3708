//! Repository traits for settings.

use async_trait::async_trait;

use super::settings_model::{Settings, SettingsUpdate};
use crate::errors::Result;

/// Repository trait for the key/value settings table.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Get all settings, with defaults for missing keys.
    fn get_settings(&self) -> Result<Settings>;

    /// Upsert every field present in the update.
    async fn update_settings(&self, new_settings: &SettingsUpdate) -> Result<()>;
}
