//! SQLite storage implementation for stock movements.

mod model;
mod repository;

pub use model::InventoryMovementDB;
pub use repository::InventoryRepository;
pub(crate) use repository::record_movement;
