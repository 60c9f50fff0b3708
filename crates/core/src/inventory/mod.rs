//! Inventory module - stock movements, adjustments and stock alerts.

mod inventory_model;
mod inventory_service;
mod inventory_traits;
mod stock_alerts;

#[cfg(test)]
mod inventory_service_tests;

pub use inventory_model::{
    InventoryMovement, InventorySummary, MovementQuery, MovementType, NewInventoryMovement,
    StockAdjustment, StockAdjustmentResult, StockChange,
};
pub use inventory_service::InventoryService;
pub use inventory_traits::{InventoryRepositoryTrait, InventoryServiceTrait};
pub use stock_alerts::detect_stock_alerts;
