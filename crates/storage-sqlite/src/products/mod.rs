//! SQLite storage implementation for the product catalogue.

mod model;
mod repository;

pub use model::ProductDB;
pub use repository::ProductRepository;
pub(crate) use repository::{load_product, load_products_by_ids, set_stock};
