use async_trait::async_trait;
use std::sync::Arc;

use super::notifications_model::{NewNotification, Notification, NotificationQuery};
use super::notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
use crate::errors::{Error, Result};
use crate::utils::pagination::{normalize_page, Paginated};

pub struct NotificationService {
    repository: Arc<dyn NotificationRepositoryTrait>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    fn list_notifications(&self, mut query: NotificationQuery) -> Result<Paginated<Notification>> {
        let (page, page_size) = normalize_page(query.page, query.page_size);
        query.page = Some(page);
        query.page_size = Some(page_size);
        self.repository.list(&query)
    }

    fn unread_count(&self) -> Result<i64> {
        self.repository.unread_count()
    }

    async fn create_notifications(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<Vec<Notification>> {
        if notifications.is_empty() {
            return Ok(Vec::new());
        }
        self.repository.create_many(notifications).await
    }

    async fn mark_read(&self, notification_id: &str) -> Result<()> {
        if self.repository.mark_read(notification_id).await? == 0 {
            return Err(Error::not_found("Notification", notification_id));
        }
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<usize> {
        self.repository.mark_all_read().await
    }
}
