//! RetailPOS Core - domain entities, services, and traits.
//!
//! This crate contains the business rules of the point-of-sale backend:
//! catalogue, stock, sales and the events they raise. It is
//! database-agnostic and defines traits that are implemented by the
//! `storage-sqlite` crate.

pub mod categories;
pub mod constants;
pub mod errors;
pub mod events;
pub mod farewell;
pub mod feedback;
pub mod inventory;
pub mod notifications;
pub mod products;
pub mod reports;
pub mod settings;
pub mod transactions;
pub mod users;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
