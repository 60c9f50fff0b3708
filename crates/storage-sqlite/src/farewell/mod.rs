//! SQLite storage implementation for farewell messages.

mod model;
mod repository;

pub use model::FarewellMessageDB;
pub use repository::FarewellRepository;
