//! Low stock and reorder point detection over committed stock changes.

use crate::events::DomainEvent;

use super::StockChange;

/// Turns stock changes into alert events.
///
/// A low stock alert fires when stock went down and ended at or below the
/// threshold. A reorder alert fires only when the reorder point was crossed.
pub fn detect_stock_alerts(changes: &[StockChange]) -> Vec<DomainEvent> {
    let mut events = Vec::new();
    for change in changes {
        let went_down = change.stock_after < change.stock_before;
        if went_down && change.stock_after <= change.low_stock_threshold {
            events.push(DomainEvent::LowStockDetected {
                product_id: change.product_id.clone(),
                sku: change.sku.clone(),
                name: change.name.clone(),
                stock: change.stock_after,
                threshold: change.low_stock_threshold,
            });
        }
        if change.stock_after <= change.reorder_point && change.stock_before > change.reorder_point
        {
            events.push(DomainEvent::ReorderPointReached {
                product_id: change.product_id.clone(),
                sku: change.sku.clone(),
                name: change.name.clone(),
                stock: change.stock_after,
                reorder_point: change.reorder_point,
            });
        }
    }
    events
}
