//! Planning functions for domain event batches.
//!
//! These functions look at a debounced batch and decide which notifications
//! to persist, which receipts to send and what to publish to live clients.

use std::collections::HashMap;

use retailpos_core::{events::DomainEvent, notifications::NewNotification};

use crate::events::{
    ServerEvent, INVENTORY_ADJUSTED, INVENTORY_LOW_STOCK, INVENTORY_REORDER,
    TRANSACTION_CANCELLED, TRANSACTION_COMPLETED,
};

/// A receipt to hand over to the mail collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptEmail {
    pub transaction_id: String,
    pub invoice_number: String,
    pub recipient: String,
}

/// Collapses stock alerts so each product raises at most one alert of each
/// kind per batch. The latest reading wins and keeps the slot of the first.
pub fn dedupe_stock_alerts(events: &[DomainEvent]) -> Vec<&DomainEvent> {
    let mut kept: Vec<&DomainEvent> = Vec::with_capacity(events.len());
    let mut slots: HashMap<(&'static str, &str), usize> = HashMap::new();

    for event in events {
        let key = match event {
            DomainEvent::LowStockDetected { product_id, .. }
            | DomainEvent::ReorderPointReached { product_id, .. } => {
                Some((event.name(), product_id.as_str()))
            }
            _ => None,
        };
        match key {
            Some(key) => match slots.get(&key) {
                Some(&slot) => kept[slot] = event,
                None => {
                    slots.insert(key, kept.len());
                    kept.push(event);
                }
            },
            None => kept.push(event),
        }
    }
    kept
}

/// Notifications to persist for a batch.
pub fn plan_notifications(events: &[DomainEvent]) -> Vec<NewNotification> {
    dedupe_stock_alerts(events)
        .into_iter()
        .filter_map(NewNotification::from_event)
        .collect()
}

/// Receipts requested by completed sales.
pub fn plan_receipts(events: &[DomainEvent]) -> Vec<ReceiptEmail> {
    events
        .iter()
        .filter_map(|event| match event {
            DomainEvent::TransactionCompleted {
                transaction_id,
                invoice_number,
                receipt_email: Some(recipient),
                ..
            } => Some(ReceiptEmail {
                transaction_id: transaction_id.clone(),
                invoice_number: invoice_number.clone(),
                recipient: recipient.clone(),
            }),
            _ => None,
        })
        .collect()
}

fn event_name(event: &DomainEvent) -> &'static str {
    match event {
        DomainEvent::TransactionCompleted { .. } => TRANSACTION_COMPLETED,
        DomainEvent::TransactionCancelled { .. } => TRANSACTION_CANCELLED,
        DomainEvent::LowStockDetected { .. } => INVENTORY_LOW_STOCK,
        DomainEvent::ReorderPointReached { .. } => INVENTORY_REORDER,
        DomainEvent::StockAdjusted { .. } => INVENTORY_ADJUSTED,
    }
}

/// Live updates for SSE clients, one per (deduplicated) event.
pub fn plan_server_events(events: &[DomainEvent]) -> Vec<ServerEvent> {
    dedupe_stock_alerts(events)
        .into_iter()
        .map(|event| match serde_json::to_value(event) {
            Ok(payload) => ServerEvent::with_payload(event_name(event), payload),
            Err(e) => {
                tracing::warn!("Could not serialize {} payload: {}", event.name(), e);
                ServerEvent::new(event_name(event))
            }
        })
        .collect()
}
