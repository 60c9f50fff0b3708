use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::inventory_model::{
    InventoryMovement, InventorySummary, MovementQuery, StockAdjustment, StockAdjustmentResult,
};
use super::inventory_traits::{InventoryRepositoryTrait, InventoryServiceTrait};
use super::stock_alerts::detect_stock_alerts;
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::utils::pagination::{normalize_page, Paginated};

/// Manual stock adjustments and movement history.
pub struct InventoryService {
    repository: Arc<dyn InventoryRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl InventoryService {
    pub fn new(
        repository: Arc<dyn InventoryRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            event_sink,
        }
    }
}

#[async_trait]
impl InventoryServiceTrait for InventoryService {
    fn list_movements(&self, mut query: MovementQuery) -> Result<Paginated<InventoryMovement>> {
        let (page, page_size) = normalize_page(query.page, query.page_size);
        query.page = Some(page);
        query.page_size = Some(page_size);
        self.repository.list_movements(&query)
    }

    fn get_summary(&self) -> Result<InventorySummary> {
        self.repository.get_summary()
    }

    async fn adjust_stock(
        &self,
        mut adjustment: StockAdjustment,
        user_id: Option<String>,
    ) -> Result<StockAdjustmentResult> {
        adjustment.validate()?;
        let result = self.repository.adjust_stock(adjustment, user_id).await?;
        debug!(
            "Adjusted stock of {} from {} to {}",
            result.change.sku, result.change.stock_before, result.change.stock_after
        );

        let mut events = vec![DomainEvent::stock_adjusted(
            result.movement.product_id.clone(),
            result.movement.movement_type,
            result.movement.quantity_change,
        )];
        events.extend(detect_stock_alerts(std::slice::from_ref(&result.change)));
        self.event_sink.emit_batch(events);

        Ok(result)
    }
}
