//! Database model for store settings.

use diesel::prelude::*;

/// One key/value row of the store configuration.
#[derive(Queryable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::app_settings)]
pub struct AppSettingDB {
    pub setting_key: String,
    pub setting_value: String,
}
