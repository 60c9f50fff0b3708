use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::to_utc;
use retailpos_core::farewell::FarewellMessage;

#[derive(Queryable, Insertable, Selectable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::farewell_messages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FarewellMessageDB {
    pub id: String,
    pub message: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<FarewellMessageDB> for FarewellMessage {
    fn from(db: FarewellMessageDB) -> Self {
        Self {
            id: db.id,
            message: db.message,
            is_active: db.is_active,
            created_at: to_utc(db.created_at),
            updated_at: to_utc(db.updated_at),
        }
    }
}
