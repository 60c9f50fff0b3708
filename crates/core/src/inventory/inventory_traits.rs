use async_trait::async_trait;

use super::inventory_model::{
    InventoryMovement, InventorySummary, MovementQuery, StockAdjustment, StockAdjustmentResult,
};
use crate::errors::Result;
use crate::utils::pagination::Paginated;

#[async_trait]
pub trait InventoryRepositoryTrait: Send + Sync {
    /// Movements matching the query, newest first.
    fn list_movements(&self, query: &MovementQuery) -> Result<Paginated<InventoryMovement>>;
    fn get_summary(&self) -> Result<InventorySummary>;

    /// Re-reads the product, applies the delta and appends the movement in a
    /// single database transaction.
    async fn adjust_stock(
        &self,
        adjustment: StockAdjustment,
        user_id: Option<String>,
    ) -> Result<StockAdjustmentResult>;
}

#[async_trait]
pub trait InventoryServiceTrait: Send + Sync {
    fn list_movements(&self, query: MovementQuery) -> Result<Paginated<InventoryMovement>>;
    fn get_summary(&self) -> Result<InventorySummary>;
    async fn adjust_stock(
        &self,
        adjustment: StockAdjustment,
        user_id: Option<String>,
    ) -> Result<StockAdjustmentResult>;
}
