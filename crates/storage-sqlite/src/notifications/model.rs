use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::warn;

use crate::utils::to_utc;
use retailpos_core::notifications::{Notification, NotificationKind};

#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NotificationDB {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub product_id: Option<String>,
    pub transaction_id: Option<String>,
    pub recipient: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl From<NotificationDB> for Notification {
    fn from(db: NotificationDB) -> Self {
        let kind = db.kind.parse().unwrap_or_else(|_| {
            warn!("Unknown notification kind '{}' on {}", db.kind, db.id);
            NotificationKind::LowStock
        });
        Self {
            id: db.id,
            kind,
            title: db.title,
            message: db.message,
            product_id: db.product_id,
            transaction_id: db.transaction_id,
            recipient: db.recipient,
            is_read: db.is_read,
            created_at: to_utc(db.created_at),
        }
    }
}
