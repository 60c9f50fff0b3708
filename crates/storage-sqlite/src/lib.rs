//! SQLite persistence for RetailPOS: Diesel models, embedded migrations and
//! one repository per core trait.
//!
//! Reads go through the r2d2 pool. Every write goes through the single writer
//! actor ([`WriteHandle`]), which runs each job inside one `BEGIN IMMEDIATE`
//! transaction, so a sale's stock checks and decrements cannot interleave with
//! another sale.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod categories;
pub mod farewell;
pub mod feedback;
pub mod inventory;
pub mod notifications;
pub mod products;
pub mod reports;
pub mod settings;
pub mod transactions;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, ping, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use categories::CategoryRepository;
pub use farewell::FarewellRepository;
pub use feedback::FeedbackRepository;
pub use inventory::InventoryRepository;
pub use notifications::NotificationRepository;
pub use products::ProductRepository;
pub use reports::ReportRepository;
pub use settings::SettingsRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;
