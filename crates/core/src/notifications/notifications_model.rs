use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};
use crate::events::DomainEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    LowStock,
    ReorderPoint,
    Receipt,
    TransactionCancelled,
}

impl NotificationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::LowStock => "LOW_STOCK",
            NotificationKind::ReorderPoint => "REORDER_POINT",
            NotificationKind::Receipt => "RECEIPT",
            NotificationKind::TransactionCancelled => "TRANSACTION_CANCELLED",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "LOW_STOCK" => Ok(NotificationKind::LowStock),
            "REORDER_POINT" => Ok(NotificationKind::ReorderPoint),
            "RECEIPT" => Ok(NotificationKind::Receipt),
            "TRANSACTION_CANCELLED" => Ok(NotificationKind::TransactionCancelled),
            other => Err(Error::Validation(ValidationError::field(
                "kind",
                format!("unknown notification kind '{}'", other),
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub product_id: Option<String>,
    pub transaction_id: Option<String>,
    /// Email address for receipt notifications.
    pub recipient: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub product_id: Option<String>,
    pub transaction_id: Option<String>,
    pub recipient: Option<String>,
}

impl NewNotification {
    /// Maps an event to the notification staff should see, if any.
    pub fn from_event(event: &DomainEvent) -> Option<Self> {
        match event {
            DomainEvent::LowStockDetected {
                product_id,
                sku,
                name,
                stock,
                threshold,
            } => Some(Self {
                kind: NotificationKind::LowStock,
                title: format!("Low stock: {}", name),
                message: format!(
                    "{} ({}) has {} left, at or below the threshold of {}",
                    name, sku, stock, threshold
                ),
                product_id: Some(product_id.clone()),
                transaction_id: None,
                recipient: None,
            }),
            DomainEvent::ReorderPointReached {
                product_id,
                sku,
                name,
                stock,
                reorder_point,
            } => Some(Self {
                kind: NotificationKind::ReorderPoint,
                title: format!("Reorder {}", name),
                message: format!(
                    "{} ({}) dropped to {}, reorder point is {}",
                    name, sku, stock, reorder_point
                ),
                product_id: Some(product_id.clone()),
                transaction_id: None,
                recipient: None,
            }),
            DomainEvent::TransactionCompleted {
                transaction_id,
                invoice_number,
                total,
                receipt_email: Some(email),
            } => Some(Self {
                kind: NotificationKind::Receipt,
                title: format!("Receipt {}", invoice_number),
                message: format!("Receipt for {} (total {}) sent to {}", invoice_number, total, email),
                product_id: None,
                transaction_id: Some(transaction_id.clone()),
                recipient: Some(email.clone()),
            }),
            DomainEvent::TransactionCancelled {
                transaction_id,
                invoice_number,
            } => Some(Self {
                kind: NotificationKind::TransactionCancelled,
                title: format!("Sale {} cancelled", invoice_number),
                message: format!("Sale {} was cancelled and its stock restored", invoice_number),
                product_id: None,
                transaction_id: Some(transaction_id.clone()),
                recipient: None,
            }),
            DomainEvent::TransactionCompleted { .. } | DomainEvent::StockAdjusted { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
