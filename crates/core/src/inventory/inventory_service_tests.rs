use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

use super::*;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, MockDomainEventSink};
use crate::products::Product;
use crate::utils::pagination::Paginated;

#[derive(Clone)]
struct MockInventoryRepository {
    product: Arc<Mutex<Product>>,
    movements: Arc<Mutex<Vec<InventoryMovement>>>,
}

impl MockInventoryRepository {
    fn with_stock(stock: i64) -> Self {
        Self {
            product: Arc::new(Mutex::new(Product {
                id: "p1".to_string(),
                sku: "SOAP-01".to_string(),
                name: "Hand Soap".to_string(),
                description: None,
                category_id: None,
                price: dec!(2.20),
                cost_price: Some(dec!(1.10)),
                stock,
                low_stock_threshold: 5,
                reorder_point: 10,
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })),
            movements: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl InventoryRepositoryTrait for MockInventoryRepository {
    fn list_movements(&self, query: &MovementQuery) -> Result<Paginated<InventoryMovement>> {
        let mut data: Vec<InventoryMovement> = self
            .movements
            .lock()
            .unwrap()
            .iter()
            .filter(|m| query.movement_type.map_or(true, |t| m.movement_type == t))
            .cloned()
            .collect();
        data.reverse();
        let total = data.len() as i64;
        Ok(Paginated::new(
            data,
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(25),
            total,
        ))
    }

    fn get_summary(&self) -> Result<InventorySummary> {
        let product = self.product.lock().unwrap().clone();
        Ok(InventorySummary::from_products(&[product]))
    }

    async fn adjust_stock(
        &self,
        adjustment: StockAdjustment,
        user_id: Option<String>,
    ) -> Result<StockAdjustmentResult> {
        let mut product = self.product.lock().unwrap();
        if product.id != adjustment.product_id {
            return Err(Error::not_found("Product", adjustment.product_id));
        }
        let after = adjustment.resulting_stock(&product)?;
        let change = StockChange::new(&product, after);
        product.stock = after;

        let movement = InventoryMovement {
            id: format!("m{}", self.movements.lock().unwrap().len() + 1),
            product_id: product.id.clone(),
            movement_type: adjustment.movement_type,
            quantity_change: adjustment.quantity_change,
            stock_before: change.stock_before,
            stock_after: change.stock_after,
            reference_id: None,
            note: adjustment.note,
            user_id,
            created_at: Utc::now(),
        };
        self.movements.lock().unwrap().push(movement.clone());
        Ok(StockAdjustmentResult { movement, change })
    }
}

fn adjustment(movement_type: MovementType, quantity_change: i64) -> StockAdjustment {
    StockAdjustment {
        product_id: "p1".to_string(),
        movement_type,
        quantity_change,
        note: None,
    }
}

#[tokio::test]
async fn test_restock_emits_adjusted_event_only() {
    let repo = MockInventoryRepository::with_stock(3);
    let sink = MockDomainEventSink::new();
    let service = InventoryService::new(Arc::new(repo.clone()), Arc::new(sink.clone()));

    let result = service
        .adjust_stock(adjustment(MovementType::Restock, 20), Some("u1".to_string()))
        .await
        .unwrap();

    assert_eq!(result.change.stock_after, 23);
    assert_eq!(result.movement.user_id.as_deref(), Some("u1"));
    assert_eq!(
        sink.events(),
        vec![DomainEvent::stock_adjusted(
            "p1".to_string(),
            MovementType::Restock,
            20
        )]
    );
}

#[tokio::test]
async fn test_shrinkage_into_low_stock_raises_alerts() {
    let repo = MockInventoryRepository::with_stock(12);
    let sink = MockDomainEventSink::new();
    let service = InventoryService::new(Arc::new(repo), Arc::new(sink.clone()));

    service
        .adjust_stock(adjustment(MovementType::Adjustment, -8), None)
        .await
        .unwrap();

    let names: Vec<&str> = sink.events().iter().map(|e| e.name()).collect();
    assert_eq!(
        names,
        vec!["stock_adjusted", "low_stock_detected", "reorder_point_reached"]
    );
    assert!(matches!(
        sink.stock_alerts().first(),
        Some(DomainEvent::LowStockDetected { stock: 4, .. })
    ));
}

#[tokio::test]
async fn test_adjustment_below_zero_is_rejected_without_events() {
    let repo = MockInventoryRepository::with_stock(2);
    let sink = MockDomainEventSink::new();
    let service = InventoryService::new(Arc::new(repo.clone()), Arc::new(sink.clone()));

    let err = service
        .adjust_stock(adjustment(MovementType::Adjustment, -3), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InsufficientStock { available: 2, .. }));
    assert_eq!(repo.product.lock().unwrap().stock, 2);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_list_movements_filters_by_type() {
    let repo = MockInventoryRepository::with_stock(10);
    let service = InventoryService::new(Arc::new(repo), Arc::new(MockDomainEventSink::new()));
    service
        .adjust_stock(adjustment(MovementType::Restock, 5), None)
        .await
        .unwrap();
    service
        .adjust_stock(adjustment(MovementType::Adjustment, -1), None)
        .await
        .unwrap();

    let restocks = service
        .list_movements(MovementQuery {
            movement_type: Some(MovementType::Restock),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(restocks.meta.total_row_count, 1);
    assert_eq!(restocks.data[0].stock_after, 15);

    let all = service.list_movements(MovementQuery::default()).unwrap();
    assert_eq!(all.data[0].movement_type, MovementType::Adjustment);
}
