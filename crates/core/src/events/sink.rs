//! Where services hand off their events.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::DomainEvent;

/// Receives events from the sales and inventory services once their write
/// has committed.
///
/// `emit` runs on the request path, so implementations only enqueue. A sink
/// that cannot deliver drops the event; the sale or adjustment has already
/// happened.
pub trait DomainEventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);

    /// A sale produces its completion event together with any stock alerts;
    /// sinks that care about grouping can override this.
    fn emit_batch(&self, events: Vec<DomainEvent>) {
        events.into_iter().for_each(|event| self.emit(event));
    }
}

/// Drops every event. Used when nothing listens, e.g. one-off maintenance.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpDomainEventSink;

impl DomainEventSink for NoOpDomainEventSink {
    fn emit(&self, _event: DomainEvent) {}
}

/// Records events in memory so tests can assert on what a service emitted.
#[derive(Clone, Default)]
pub struct MockDomainEventSink {
    recorded: Arc<Mutex<Vec<DomainEvent>>>,
}

impl MockDomainEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn recorded(&self) -> MutexGuard<'_, Vec<DomainEvent>> {
        // A panicking test thread must not hide the events of the others.
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.recorded().clone()
    }

    /// Only the low-stock and reorder alerts, in emission order.
    pub fn stock_alerts(&self) -> Vec<DomainEvent> {
        self.recorded()
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    DomainEvent::LowStockDetected { .. } | DomainEvent::ReorderPointReached { .. }
                )
            })
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.recorded().clear();
    }

    pub fn len(&self) -> usize {
        self.recorded().len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorded().is_empty()
    }
}

impl DomainEventSink for MockDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        self.recorded().push(event);
    }

    fn emit_batch(&self, events: Vec<DomainEvent>) {
        self.recorded().extend(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn low_stock(sku: &str, stock: i64) -> DomainEvent {
        DomainEvent::LowStockDetected {
            product_id: format!("p-{sku}"),
            sku: sku.to_string(),
            name: sku.to_string(),
            stock,
            threshold: 3,
        }
    }

    #[test]
    fn test_mock_sink_keeps_sale_batch_in_order() {
        let sink = MockDomainEventSink::new();
        assert!(sink.is_empty());

        sink.emit_batch(vec![
            DomainEvent::transaction_completed(
                "tx-1".to_string(),
                "INV-20240101-0001".to_string(),
                dec!(11),
                None,
            ),
            low_stock("PEN", 2),
            low_stock("CUP", 0),
        ]);
        sink.emit(DomainEvent::transaction_cancelled(
            "tx-1".to_string(),
            "INV-20240101-0001".to_string(),
        ));

        assert_eq!(sink.len(), 4);
        assert_eq!(sink.stock_alerts(), vec![low_stock("PEN", 2), low_stock("CUP", 0)]);
        assert_eq!(sink.events()[3].name(), "transaction_cancelled");

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_noop_sink_accepts_batches() {
        NoOpDomainEventSink.emit_batch(vec![low_stock("PEN", 1)]);
    }
}
