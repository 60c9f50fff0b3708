//! Event queue worker for processing domain events.
//!
//! Receives events from an mpsc channel, debounces them with a 500ms window,
//! then turns each batch into notifications, receipt emails and SSE updates.

use std::sync::Arc;
use std::time::Duration;

use retailpos_core::{events::DomainEvent, notifications::NotificationServiceTrait};
use tokio::sync::mpsc;

use super::planner::{plan_notifications, plan_receipts, plan_server_events};
use crate::events::EventBus;

/// Debounce window for collecting events before processing.
const DEBOUNCE_DURATION: Duration = Duration::from_millis(500);

pub struct QueueWorkerDeps {
    pub notification_service: Arc<dyn NotificationServiceTrait>,
    pub event_bus: EventBus,
}

/// Runs the event queue worker until the channel closes.
///
/// Batches are processed inline, so they never overlap: events that arrive
/// while a batch is being written wait in the channel for the next one.
pub async fn event_queue_worker(
    mut rx: mpsc::UnboundedReceiver<DomainEvent>,
    deps: Arc<QueueWorkerDeps>,
) {
    tracing::info!("Domain event queue worker started");

    let mut pending_events: Vec<DomainEvent> = Vec::new();

    loop {
        if pending_events.is_empty() {
            match rx.recv().await {
                Some(e) => pending_events.push(e),
                None => break,
            }
            continue;
        }

        tokio::select! {
            event = rx.recv() => match event {
                Some(e) => pending_events.push(e),
                None => {
                    process_event_batch(&std::mem::take(&mut pending_events), &deps).await;
                    break;
                }
            },
            _ = tokio::time::sleep(DEBOUNCE_DURATION) => {
                process_event_batch(&std::mem::take(&mut pending_events), &deps).await;
            }
        }
    }

    tracing::info!("Domain event queue worker shutting down");
}

/// Processes a batch of domain events. Failures are logged, never raised.
async fn process_event_batch(events: &[DomainEvent], deps: &QueueWorkerDeps) {
    if events.is_empty() {
        return;
    }
    tracing::info!("Processing batch of {} domain event(s)", events.len());

    // 1. Staff notifications
    let notifications = plan_notifications(events);
    if !notifications.is_empty() {
        let count = notifications.len();
        match deps
            .notification_service
            .create_notifications(notifications)
            .await
        {
            Ok(_) => tracing::info!("Stored {} notification(s)", count),
            Err(e) => tracing::warn!("Failed to store notifications: {}", e),
        }
    }

    // 2. Receipts. Delivery is handled outside this service.
    for receipt in plan_receipts(events) {
        tracing::info!(
            transaction_id = %receipt.transaction_id,
            "Receipt {} queued for {}",
            receipt.invoice_number,
            receipt.recipient
        );
    }

    // 3. Live updates
    for event in plan_server_events(events) {
        deps.event_bus.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use retailpos_core::errors::Result;
    use retailpos_core::notifications::{NewNotification, Notification, NotificationQuery};
    use retailpos_core::utils::pagination::Paginated;
    use std::sync::Mutex;

    use crate::events::INVENTORY_LOW_STOCK;

    #[derive(Default)]
    struct RecordingNotificationService {
        batches: Mutex<Vec<Vec<NewNotification>>>,
    }

    #[async_trait]
    impl NotificationServiceTrait for RecordingNotificationService {
        fn list_notifications(&self, _query: NotificationQuery) -> Result<Paginated<Notification>> {
            Ok(Paginated::new(Vec::new(), 1, 25, 0))
        }

        fn unread_count(&self) -> Result<i64> {
            Ok(0)
        }

        async fn create_notifications(
            &self,
            notifications: Vec<NewNotification>,
        ) -> Result<Vec<Notification>> {
            let stored = notifications
                .iter()
                .enumerate()
                .map(|(i, n)| Notification {
                    id: i.to_string(),
                    kind: n.kind,
                    title: n.title.clone(),
                    message: n.message.clone(),
                    product_id: n.product_id.clone(),
                    transaction_id: n.transaction_id.clone(),
                    recipient: n.recipient.clone(),
                    is_read: false,
                    created_at: Utc::now(),
                })
                .collect();
            self.batches.lock().unwrap().push(notifications);
            Ok(stored)
        }

        async fn mark_read(&self, _notification_id: &str) -> Result<()> {
            Ok(())
        }

        async fn mark_all_read(&self) -> Result<usize> {
            Ok(0)
        }
    }

    fn low_stock(product_id: &str, stock: i64) -> DomainEvent {
        DomainEvent::LowStockDetected {
            product_id: product_id.to_string(),
            sku: "SKU".to_string(),
            name: "Widget".to_string(),
            stock,
            threshold: 5,
        }
    }

    #[tokio::test]
    async fn test_burst_is_processed_as_one_batch() {
        let service = Arc::new(RecordingNotificationService::default());
        let event_bus = EventBus::new(16);
        let mut subscriber = event_bus.subscribe();
        let deps = Arc::new(QueueWorkerDeps {
            notification_service: service.clone(),
            event_bus,
        });

        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(event_queue_worker(rx, deps));

        tx.send(low_stock("p1", 3)).unwrap();
        tx.send(low_stock("p1", 2)).unwrap();
        tx.send(low_stock("p2", 4)).unwrap();

        tokio::time::sleep(DEBOUNCE_DURATION * 3).await;
        drop(tx);
        worker.await.unwrap();

        let batches = service.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);

        let first = subscriber.try_recv().unwrap();
        assert_eq!(first.name, INVENTORY_LOW_STOCK);
    }

    #[tokio::test]
    async fn test_events_after_a_flush_start_a_new_batch() {
        let service = Arc::new(RecordingNotificationService::default());
        let deps = Arc::new(QueueWorkerDeps {
            notification_service: service.clone(),
            event_bus: EventBus::new(16),
        });

        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(event_queue_worker(rx, deps));

        tx.send(low_stock("p1", 3)).unwrap();
        tokio::time::sleep(DEBOUNCE_DURATION * 3).await;
        tx.send(low_stock("p2", 1)).unwrap();
        tokio::time::sleep(DEBOUNCE_DURATION * 3).await;
        drop(tx);
        worker.await.unwrap();

        let batches = service.batches.lock().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1][0].product_id.as_deref(), Some("p2"));
    }

    #[tokio::test]
    async fn test_pending_events_flush_on_shutdown() {
        let service = Arc::new(RecordingNotificationService::default());
        let deps = Arc::new(QueueWorkerDeps {
            notification_service: service.clone(),
            event_bus: EventBus::new(16),
        });

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(low_stock("p1", 1)).unwrap();
        drop(tx);
        event_queue_worker(rx, deps).await;

        assert_eq!(service.batches.lock().unwrap().len(), 1);
    }
}
