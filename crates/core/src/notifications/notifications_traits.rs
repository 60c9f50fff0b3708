use async_trait::async_trait;

use super::notifications_model::{NewNotification, Notification, NotificationQuery};
use crate::errors::Result;
use crate::utils::pagination::Paginated;

#[async_trait]
pub trait NotificationRepositoryTrait: Send + Sync {
    /// Newest first.
    fn list(&self, query: &NotificationQuery) -> Result<Paginated<Notification>>;
    fn unread_count(&self) -> Result<i64>;
    async fn create_many(&self, notifications: Vec<NewNotification>) -> Result<Vec<Notification>>;
    async fn mark_read(&self, notification_id: &str) -> Result<usize>;
    async fn mark_all_read(&self) -> Result<usize>;
}

#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    fn list_notifications(&self, query: NotificationQuery) -> Result<Paginated<Notification>>;
    fn unread_count(&self) -> Result<i64>;
    async fn create_notifications(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<Vec<Notification>>;
    async fn mark_read(&self, notification_id: &str) -> Result<()>;
    async fn mark_all_read(&self) -> Result<usize>;
}
