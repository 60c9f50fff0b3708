//! SQLite storage implementation for product categories.

mod model;
mod repository;

pub use model::CategoryDB;
pub use repository::CategoryRepository;
