use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use super::model::AppSettingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::app_settings::dsl::*;
use retailpos_core::errors::Result;
use retailpos_core::settings::{Settings, SettingsRepositoryTrait, SettingsUpdate};

pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }
}

fn upsert(conn: &mut SqliteConnection, key: &str, value: String) -> Result<()> {
    diesel::replace_into(app_settings)
        .values(&AppSettingDB {
            setting_key: key.to_string(),
            setting_value: value,
        })
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_settings(&self) -> Result<Settings> {
        let mut conn = get_connection(&self.pool)?;
        let all_settings: Vec<(String, String)> = app_settings
            .select((setting_key, setting_value))
            .load::<(String, String)>(&mut conn)
            .into_core()?;

        let mut settings = Settings::default();
        for (key, value) in all_settings {
            settings.apply(&key, value);
        }
        Ok(settings)
    }

    async fn update_settings(&self, new_settings: &SettingsUpdate) -> Result<()> {
        let entries = new_settings.entries();
        self.writer
            .exec(move |conn| {
                for (key, value) in entries {
                    upsert(conn, key, value)?;
                }
                Ok(())
            })
            .await
    }
}
