//! SQLite storage implementation for staff users.

mod model;
mod repository;

pub use model::UserDB;
pub use repository::UserRepository;
