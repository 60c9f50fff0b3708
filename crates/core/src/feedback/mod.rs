//! Customer feedback collected after checkout.

mod feedback_model;
mod feedback_service;
mod feedback_traits;

pub use feedback_model::{CustomerFeedback, FeedbackQuery, FeedbackStats, NewFeedback, RatingCount};
pub use feedback_service::FeedbackService;
pub use feedback_traits::{FeedbackRepositoryTrait, FeedbackServiceTrait};
