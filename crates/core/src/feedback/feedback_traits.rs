use async_trait::async_trait;

use super::feedback_model::{CustomerFeedback, FeedbackQuery, FeedbackStats, NewFeedback};
use crate::errors::Result;
use crate::utils::pagination::Paginated;

#[async_trait]
pub trait FeedbackRepositoryTrait: Send + Sync {
    /// Newest first.
    fn list(&self, query: &FeedbackQuery) -> Result<Paginated<CustomerFeedback>>;
    /// `(rating, count)` pairs.
    fn rating_counts(&self) -> Result<Vec<(i32, i64)>>;
    async fn create(&self, new_feedback: NewFeedback) -> Result<CustomerFeedback>;
    async fn delete(&self, feedback_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait FeedbackServiceTrait: Send + Sync {
    fn list_feedback(&self, query: FeedbackQuery) -> Result<Paginated<CustomerFeedback>>;
    fn get_feedback_stats(&self) -> Result<FeedbackStats>;
    async fn submit_feedback(&self, new_feedback: NewFeedback) -> Result<CustomerFeedback>;
    async fn delete_feedback(&self, feedback_id: &str) -> Result<()>;
}
