//! Inventory domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_LINE_QUANTITY;
use crate::errors::{Error, Result, ValidationError};
use crate::products::Product;

/// Reason a product's stock changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Initial,
    Sale,
    SaleCancellation,
    Restock,
    Adjustment,
}

impl MovementType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementType::Initial => "INITIAL",
            MovementType::Sale => "SALE",
            MovementType::SaleCancellation => "SALE_CANCELLATION",
            MovementType::Restock => "RESTOCK",
            MovementType::Adjustment => "ADJUSTMENT",
        }
    }

    /// Whether staff may record this movement by hand.
    pub fn is_manual(&self) -> bool {
        matches!(self, MovementType::Restock | MovementType::Adjustment)
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_uppercase().as_str() {
            "INITIAL" => Ok(MovementType::Initial),
            "SALE" => Ok(MovementType::Sale),
            "SALE_CANCELLATION" => Ok(MovementType::SaleCancellation),
            "RESTOCK" => Ok(MovementType::Restock),
            "ADJUSTMENT" => Ok(MovementType::Adjustment),
            other => Err(Error::Validation(ValidationError::field(
                "movementType",
                format!("unknown movement type '{}'", other),
            ))),
        }
    }
}

/// Append-only record of a stock delta.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    pub id: String,
    pub product_id: String,
    pub movement_type: MovementType,
    pub quantity_change: i64,
    pub stock_before: i64,
    pub stock_after: i64,
    pub reference_id: Option<String>,
    pub note: Option<String>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Movement about to be appended by a storage write.
#[derive(Debug, Clone)]
pub struct NewInventoryMovement {
    pub product_id: String,
    pub movement_type: MovementType,
    pub quantity_change: i64,
    pub stock_before: i64,
    pub stock_after: i64,
    pub reference_id: Option<String>,
    pub note: Option<String>,
    pub user_id: Option<String>,
}

/// Manual stock change requested by staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub product_id: String,
    pub movement_type: MovementType,
    pub quantity_change: i64,
    pub note: Option<String>,
}

impl StockAdjustment {
    pub fn validate(&mut self) -> Result<()> {
        if self.product_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "productId".to_string(),
            )));
        }
        match self.movement_type {
            MovementType::Restock if self.quantity_change <= 0 => {
                return Err(Error::Validation(ValidationError::field(
                    "quantityChange",
                    "restock quantity must be positive",
                )));
            }
            MovementType::Adjustment if self.quantity_change == 0 => {
                return Err(Error::Validation(ValidationError::field(
                    "quantityChange",
                    "adjustment must not be zero",
                )));
            }
            t if !t.is_manual() => {
                return Err(Error::Validation(ValidationError::field(
                    "movementType",
                    format!("{} movements cannot be recorded manually", t),
                )));
            }
            _ => {}
        }
        if self.quantity_change.unsigned_abs() > MAX_LINE_QUANTITY.unsigned_abs() {
            return Err(Error::Validation(ValidationError::field(
                "quantityChange",
                format!("must be at most {} units", MAX_LINE_QUANTITY),
            )));
        }
        self.note = self
            .note
            .take()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Ok(())
    }

    /// Stock the product would have after this adjustment.
    ///
    /// Fails with `InsufficientStock` when the result would be negative.
    pub fn resulting_stock(&self, product: &Product) -> Result<i64> {
        let after = product.stock.checked_add(self.quantity_change).ok_or_else(|| {
            Error::Validation(ValidationError::field(
                "quantityChange",
                "stock would exceed the supported range",
            ))
        })?;
        if after < 0 {
            return Err(Error::InsufficientStock {
                product_id: product.id.clone(),
                sku: product.sku.clone(),
                requested: self.quantity_change.saturating_neg(),
                available: product.stock,
            });
        }
        Ok(after)
    }
}

/// Stock transition of one product produced by a committed write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockChange {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub stock_before: i64,
    pub stock_after: i64,
    pub low_stock_threshold: i64,
    pub reorder_point: i64,
}

impl StockChange {
    pub fn new(product: &Product, stock_after: i64) -> Self {
        Self {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            stock_before: product.stock,
            stock_after,
            low_stock_threshold: product.low_stock_threshold,
            reorder_point: product.reorder_point,
        }
    }

    pub fn delta(&self) -> i64 {
        self.stock_after - self.stock_before
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustmentResult {
    pub movement: InventoryMovement,
    pub change: StockChange,
}

/// Filters for the movement history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementQuery {
    pub product_id: Option<String>,
    pub movement_type: Option<MovementType>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Aggregate view over active products.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub product_count: i64,
    pub total_units: i64,
    /// Sum of stock valued at cost, or at price when no cost is known.
    pub stock_value: Decimal,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
    pub reorder_count: i64,
}

impl InventorySummary {
    /// Builds the summary from a product listing.
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        let mut summary = InventorySummary::default();
        for product in products.into_iter().filter(|p| p.is_active) {
            summary.product_count += 1;
            summary.total_units += product.stock;
            let unit_value = product.cost_price.unwrap_or(product.price);
            summary.stock_value += unit_value * Decimal::from(product.stock);
            if product.stock <= 0 {
                summary.out_of_stock_count += 1;
            }
            if product.is_low_stock() {
                summary.low_stock_count += 1;
            }
            if product.needs_reorder() {
                summary.reorder_count += 1;
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(stock: i64, cost: Option<Decimal>) -> Product {
        Product {
            id: "p1".to_string(),
            sku: "TEA-01".to_string(),
            name: "Green Tea".to_string(),
            description: None,
            category_id: None,
            price: dec!(3.00),
            cost_price: cost,
            stock,
            low_stock_threshold: 5,
            reorder_point: 10,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_movement_type_round_trips_through_str() {
        for t in [
            MovementType::Initial,
            MovementType::Sale,
            MovementType::SaleCancellation,
            MovementType::Restock,
            MovementType::Adjustment,
        ] {
            assert_eq!(t.as_str().parse::<MovementType>().unwrap(), t);
        }
        assert!("TELEPORT".parse::<MovementType>().is_err());
    }

    #[test]
    fn test_adjustment_validation() {
        let mut restock = StockAdjustment {
            product_id: "p1".to_string(),
            movement_type: MovementType::Restock,
            quantity_change: -2,
            note: None,
        };
        assert!(restock.validate().is_err());

        let mut sale = StockAdjustment {
            product_id: "p1".to_string(),
            movement_type: MovementType::Sale,
            quantity_change: -1,
            note: None,
        };
        assert!(sale.validate().is_err());

        let mut shrink = StockAdjustment {
            product_id: "p1".to_string(),
            movement_type: MovementType::Adjustment,
            quantity_change: -1,
            note: Some("  broken jar ".to_string()),
        };
        shrink.validate().unwrap();
        assert_eq!(shrink.note.as_deref(), Some("broken jar"));
    }

    #[test]
    fn test_resulting_stock_never_negative() {
        let adjustment = StockAdjustment {
            product_id: "p1".to_string(),
            movement_type: MovementType::Adjustment,
            quantity_change: -4,
            note: None,
        };
        assert_eq!(adjustment.resulting_stock(&product(4, None)).unwrap(), 0);
        match adjustment.resulting_stock(&product(3, None)) {
            Err(Error::InsufficientStock {
                requested,
                available,
                ..
            }) => {
                assert_eq!(requested, 4);
                assert_eq!(available, 3);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
    }

    #[test]
    fn test_extreme_quantities_are_rejected_not_wrapped() {
        let mut restock = StockAdjustment {
            product_id: "p1".to_string(),
            movement_type: MovementType::Restock,
            quantity_change: i64::MAX,
            note: None,
        };
        assert!(matches!(restock.validate(), Err(Error::Validation(_))));
        assert!(matches!(
            restock.resulting_stock(&product(5, None)),
            Err(Error::Validation(_))
        ));

        let mut drain = StockAdjustment {
            product_id: "p1".to_string(),
            movement_type: MovementType::Adjustment,
            quantity_change: i64::MIN,
            note: None,
        };
        assert!(matches!(drain.validate(), Err(Error::Validation(_))));
        match drain.resulting_stock(&product(5, None)) {
            Err(Error::InsufficientStock { requested, .. }) => assert_eq!(requested, i64::MAX),
            other => panic!("expected InsufficientStock, got {:?}", other),
        }

        restock.quantity_change = MAX_LINE_QUANTITY;
        restock.validate().unwrap();
    }

    #[test]
    fn test_summary_values_stock_at_cost_or_price() {
        let mut inactive = product(100, None);
        inactive.is_active = false;
        let products = vec![product(2, Some(dec!(1.50))), product(20, None), inactive];
        let summary = InventorySummary::from_products(&products);
        assert_eq!(summary.product_count, 2);
        assert_eq!(summary.total_units, 22);
        assert_eq!(summary.stock_value, dec!(63.00));
        assert_eq!(summary.low_stock_count, 1);
        assert_eq!(summary.reorder_count, 1);
        assert_eq!(summary.out_of_stock_count, 0);
    }
}
