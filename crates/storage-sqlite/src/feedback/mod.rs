//! SQLite storage implementation for customer feedback.

mod model;
mod repository;

pub use model::FeedbackDB;
pub use repository::FeedbackRepository;
