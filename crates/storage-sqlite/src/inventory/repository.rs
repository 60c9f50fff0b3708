use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::InventoryMovementDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::products::{load_product, set_stock, ProductDB};
use crate::schema::{inventory_movements, products};
use crate::utils::now_naive;
use retailpos_core::inventory::{
    InventoryMovement, InventoryRepositoryTrait, InventorySummary, MovementQuery,
    NewInventoryMovement, StockAdjustment, StockAdjustmentResult, StockChange,
};
use retailpos_core::products::Product;
use retailpos_core::utils::pagination::{normalize_page, page_offset, Paginated};
use retailpos_core::Result;

pub struct InventoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl InventoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

/// Appends a movement row. Callers run this in the same write job that
/// changes the stock.
pub(crate) fn record_movement(
    conn: &mut SqliteConnection,
    movement: NewInventoryMovement,
) -> Result<InventoryMovement> {
    let row = InventoryMovementDB {
        id: Uuid::new_v4().to_string(),
        product_id: movement.product_id,
        movement_type: movement.movement_type.as_str().to_string(),
        quantity_change: movement.quantity_change,
        stock_before: movement.stock_before,
        stock_after: movement.stock_after,
        reference_id: movement.reference_id,
        note: movement.note,
        user_id: movement.user_id,
        created_at: now_naive(),
    };
    diesel::insert_into(inventory_movements::table)
        .values(&row)
        .execute(conn)
        .into_core()?;
    Ok(InventoryMovement::from(row))
}

fn filtered(query: &MovementQuery) -> inventory_movements::BoxedQuery<'static, Sqlite> {
    let mut boxed = inventory_movements::table.into_boxed();
    if let Some(product_id) = &query.product_id {
        boxed = boxed.filter(inventory_movements::product_id.eq(product_id.clone()));
    }
    if let Some(movement_type) = query.movement_type {
        boxed = boxed.filter(inventory_movements::movement_type.eq(movement_type.as_str()));
    }
    boxed
}

#[async_trait]
impl InventoryRepositoryTrait for InventoryRepository {
    fn list_movements(&self, query: &MovementQuery) -> Result<Paginated<InventoryMovement>> {
        let mut conn = get_connection(&self.pool)?;
        let (page, page_size) = normalize_page(query.page, query.page_size);

        let total: i64 = filtered(query).count().get_result(&mut conn).into_core()?;
        let rows = filtered(query)
            .select(InventoryMovementDB::as_select())
            .order((
                inventory_movements::created_at.desc(),
                inventory_movements::id.desc(),
            ))
            .limit(page_size)
            .offset(page_offset(page, page_size))
            .load(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(InventoryMovement::from).collect(),
            page,
            page_size,
            total,
        ))
    }

    fn get_summary(&self) -> Result<InventorySummary> {
        let mut conn = get_connection(&self.pool)?;
        let rows = products::table
            .filter(products::is_active.eq(true))
            .select(ProductDB::as_select())
            .load(&mut conn)
            .into_core()?;
        let products: Vec<Product> = rows.into_iter().map(Product::from).collect();
        Ok(InventorySummary::from_products(&products))
    }

    async fn adjust_stock(
        &self,
        adjustment: StockAdjustment,
        user_id: Option<String>,
    ) -> Result<StockAdjustmentResult> {
        self.writer
            .exec(move |conn| -> Result<StockAdjustmentResult> {
                let product = Product::from(load_product(conn, &adjustment.product_id)?);
                let stock_after = adjustment.resulting_stock(&product)?;
                let change = StockChange::new(&product, stock_after);

                set_stock(conn, &product.id, stock_after)?;
                let movement = record_movement(
                    conn,
                    NewInventoryMovement {
                        product_id: product.id.clone(),
                        movement_type: adjustment.movement_type,
                        quantity_change: adjustment.quantity_change,
                        stock_before: product.stock,
                        stock_after,
                        reference_id: None,
                        note: adjustment.note,
                        user_id,
                    },
                )?;
                Ok(StockAdjustmentResult { movement, change })
            })
            .await
    }
}
