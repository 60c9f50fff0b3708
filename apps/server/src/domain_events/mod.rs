//! Domain events runtime bridge for the web server.
//!
//! Receives domain events via `DomainEventSink`, debounces them, and then:
//! - persists staff notifications (low stock, reorder, receipts, cancellations)
//! - logs receipt emails for the delivery collaborator
//! - publishes live updates on the SSE event bus
//!
//! Events are collected over a 500 ms window and handled one batch at a time.

mod planner;
mod queue_worker;
mod sink;

pub use sink::WebDomainEventSink;
