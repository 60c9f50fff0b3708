use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::feedback_model::{CustomerFeedback, FeedbackQuery, FeedbackStats, NewFeedback};
use super::feedback_traits::{FeedbackRepositoryTrait, FeedbackServiceTrait};
use crate::errors::{Error, Result};
use crate::transactions::TransactionRepositoryTrait;
use crate::utils::pagination::{normalize_page, Paginated};

pub struct FeedbackService {
    repository: Arc<dyn FeedbackRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
}

impl FeedbackService {
    pub fn new(
        repository: Arc<dyn FeedbackRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            transaction_repository,
        }
    }
}

#[async_trait]
impl FeedbackServiceTrait for FeedbackService {
    fn list_feedback(&self, mut query: FeedbackQuery) -> Result<Paginated<CustomerFeedback>> {
        let (page, page_size) = normalize_page(query.page, query.page_size);
        query.page = Some(page);
        query.page_size = Some(page_size);
        self.repository.list(&query)
    }

    fn get_feedback_stats(&self) -> Result<FeedbackStats> {
        Ok(FeedbackStats::from_counts(&self.repository.rating_counts()?))
    }

    async fn submit_feedback(&self, mut new_feedback: NewFeedback) -> Result<CustomerFeedback> {
        new_feedback.validate()?;
        if let Some(transaction_id) = &new_feedback.transaction_id {
            if !self.transaction_repository.exists(transaction_id)? {
                return Err(Error::not_found("Transaction", transaction_id.clone()));
            }
        }
        debug!("Recording {}-star feedback", new_feedback.rating);
        self.repository.create(new_feedback).await
    }

    async fn delete_feedback(&self, feedback_id: &str) -> Result<()> {
        if self.repository.delete(feedback_id).await? == 0 {
            return Err(Error::not_found("Feedback", feedback_id));
        }
        Ok(())
    }
}
