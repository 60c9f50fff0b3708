//! Web domain event sink implementation.
//!
//! Receives domain events and sends them to a background queue worker
//! for debounced processing.

use std::sync::{Arc, Mutex};

use retailpos_core::{
    events::{DomainEvent, DomainEventSink},
    notifications::NotificationServiceTrait,
};
use tokio::sync::mpsc;

use super::queue_worker::{event_queue_worker, QueueWorkerDeps};
use crate::events::EventBus;

/// Domain event sink for the web server runtime.
///
/// # Two-Phase Initialization
///
/// Services that emit events are built before the notification service the
/// worker needs, so:
///
/// 1. `new()` creates the channel; events sent now are buffered
/// 2. `start_worker()` spawns the worker once every service exists
pub struct WebDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<DomainEvent>>>,
}

impl WebDomainEventSink {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Starts the background worker. A second call is logged and ignored.
    pub fn start_worker(
        &self,
        notification_service: Arc<dyn NotificationServiceTrait>,
        event_bus: EventBus,
    ) {
        let rx = match self.rx.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(rx) = rx else {
            tracing::error!("Domain event worker already started; ignoring second start");
            return;
        };

        let deps = Arc::new(QueueWorkerDeps {
            notification_service,
            event_bus,
        });

        tokio::spawn(event_queue_worker(rx, deps));
    }

    #[cfg(test)]
    pub fn with_sender(tx: mpsc::UnboundedSender<DomainEvent>) -> Self {
        Self {
            tx,
            rx: Mutex::new(None),
        }
    }
}

impl Default for WebDomainEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEventSink for WebDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        // Best effort: a closed channel never fails the caller.
        if let Err(e) = self.tx.send(event) {
            tracing::warn!("Failed to emit domain event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cancelled(id: &str) -> DomainEvent {
        DomainEvent::transaction_cancelled(id.to_string(), format!("INV-{}", id))
    }

    #[test]
    fn test_sink_sends_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = WebDomainEventSink::with_sender(tx);

        sink.emit(cancelled("tx-1"));

        match rx.try_recv().unwrap() {
            DomainEvent::TransactionCancelled { transaction_id, .. } => {
                assert_eq!(transaction_id, "tx-1");
            }
            other => panic!("Expected TransactionCancelled, got {:?}", other),
        }
    }

    #[test]
    fn test_sink_batch_sends_all_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = WebDomainEventSink::with_sender(tx);

        sink.emit_batch(vec![cancelled("tx-1"), cancelled("tx-2")]);

        assert_eq!(rx.try_recv().unwrap(), cancelled("tx-1"));
        assert_eq!(rx.try_recv().unwrap(), cancelled("tx-2"));
    }

    #[test]
    fn test_emit_after_receiver_dropped_does_not_panic() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let sink = WebDomainEventSink::with_sender(tx);
        sink.emit(cancelled("tx-1"));
    }
}
