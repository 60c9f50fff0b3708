use super::SettingsRepositoryTrait;
use crate::errors::Result;
use crate::settings::{Settings, SettingsUpdate};
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<Settings>;

    async fn update_settings(&self, new_settings: SettingsUpdate) -> Result<Settings>;
}

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<Settings> {
        self.settings_repository.get_settings()
    }

    async fn update_settings(&self, mut new_settings: SettingsUpdate) -> Result<Settings> {
        new_settings.validate()?;
        debug!(
            "Updating settings: {:?}",
            new_settings
                .entries()
                .iter()
                .map(|(k, _)| *k)
                .collect::<Vec<_>>()
        );
        self.settings_repository
            .update_settings(&new_settings)
            .await?;
        self.get_settings()
    }
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService {
            settings_repository,
        }
    }
}
