//! SQLite storage implementation for sales transactions.

mod model;
mod repository;

pub use model::{TransactionDB, TransactionItemDB};
pub use repository::TransactionRepository;
