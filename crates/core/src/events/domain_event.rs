//! Domain event types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inventory::MovementType;

/// Domain events emitted by core services after successful mutations.
///
/// Events are facts about committed data. They are never emitted from inside
/// a database transaction and losing one never rolls anything back.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A sale was committed.
    TransactionCompleted {
        transaction_id: String,
        invoice_number: String,
        total: Decimal,
        /// Set when the customer asked for an emailed receipt.
        receipt_email: Option<String>,
    },

    /// A sale was cancelled and its stock restored.
    TransactionCancelled {
        transaction_id: String,
        invoice_number: String,
    },

    /// A product dropped to or below its low stock threshold.
    LowStockDetected {
        product_id: String,
        sku: String,
        name: String,
        stock: i64,
        threshold: i64,
    },

    /// A product crossed its reorder point on the way down.
    ReorderPointReached {
        product_id: String,
        sku: String,
        name: String,
        stock: i64,
        reorder_point: i64,
    },

    /// Stock was changed manually (restock or adjustment).
    StockAdjusted {
        product_id: String,
        movement_type: MovementType,
        quantity_change: i64,
    },
}

impl DomainEvent {
    /// Creates a TransactionCompleted event.
    pub fn transaction_completed(
        transaction_id: String,
        invoice_number: String,
        total: Decimal,
        receipt_email: Option<String>,
    ) -> Self {
        Self::TransactionCompleted {
            transaction_id,
            invoice_number,
            total,
            receipt_email,
        }
    }

    /// Creates a TransactionCancelled event.
    pub fn transaction_cancelled(transaction_id: String, invoice_number: String) -> Self {
        Self::TransactionCancelled {
            transaction_id,
            invoice_number,
        }
    }

    /// Creates a StockAdjusted event.
    pub fn stock_adjusted(
        product_id: String,
        movement_type: MovementType,
        quantity_change: i64,
    ) -> Self {
        Self::StockAdjusted {
            product_id,
            movement_type,
            quantity_change,
        }
    }

    /// Short name used for logging and live-update channels.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::TransactionCompleted { .. } => "transaction_completed",
            DomainEvent::TransactionCancelled { .. } => "transaction_cancelled",
            DomainEvent::LowStockDetected { .. } => "low_stock_detected",
            DomainEvent::ReorderPointReached { .. } => "reorder_point_reached",
            DomainEvent::StockAdjusted { .. } => "stock_adjusted",
        }
    }
}
