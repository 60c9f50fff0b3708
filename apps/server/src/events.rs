use serde_json::Value;
use tokio::sync::broadcast;

/// Event names pushed to connected clients over SSE.
pub const INVENTORY_LOW_STOCK: &str = "inventory:low-stock";
pub const INVENTORY_REORDER: &str = "inventory:reorder";
pub const INVENTORY_ADJUSTED: &str = "inventory:adjusted";
pub const TRANSACTION_COMPLETED: &str = "transaction:completed";
pub const TRANSACTION_CANCELLED: &str = "transaction:cancelled";

/// Envelope carrying an event name and an optional JSON payload.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    pub name: &'static str,
    pub payload: Option<Value>,
}

impl ServerEvent {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            payload: None,
        }
    }

    pub fn with_payload(name: &'static str, payload: Value) -> Self {
        Self {
            name,
            payload: Some(payload),
        }
    }
}

/// Broadcast bus that fans out events to any connected clients.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ServerEvent) {
        // No subscribers is not an error.
        let _ = self.sender.send(event);
    }
}
