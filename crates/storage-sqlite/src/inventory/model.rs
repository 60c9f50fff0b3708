use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::warn;

use crate::utils::to_utc;
use retailpos_core::inventory::{InventoryMovement, MovementType};

#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::inventory_movements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InventoryMovementDB {
    pub id: String,
    pub product_id: String,
    pub movement_type: String,
    pub quantity_change: i64,
    pub stock_before: i64,
    pub stock_after: i64,
    pub reference_id: Option<String>,
    pub note: Option<String>,
    pub user_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<InventoryMovementDB> for InventoryMovement {
    fn from(db: InventoryMovementDB) -> Self {
        let movement_type = db.movement_type.parse().unwrap_or_else(|_| {
            warn!(
                "Unknown movement type '{}' on movement {}",
                db.movement_type, db.id
            );
            MovementType::Adjustment
        });
        Self {
            id: db.id,
            product_id: db.product_id,
            movement_type,
            quantity_change: db.quantity_change,
            stock_before: db.stock_before,
            stock_after: db.stock_after,
            reference_id: db.reference_id,
            note: db.note,
            user_id: db.user_id,
            created_at: to_utc(db.created_at),
        }
    }
}
