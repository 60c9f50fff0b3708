use async_trait::async_trait;

use super::farewell_model::{FarewellMessage, FarewellMessageUpdate, NewFarewellMessage};
use crate::errors::Result;

#[async_trait]
pub trait FarewellRepositoryTrait: Send + Sync {
    fn list(&self, active_only: bool) -> Result<Vec<FarewellMessage>>;
    fn get_by_id(&self, message_id: &str) -> Result<FarewellMessage>;
    async fn create(&self, new_message: NewFarewellMessage) -> Result<FarewellMessage>;
    async fn update(
        &self,
        message_id: &str,
        update: FarewellMessageUpdate,
    ) -> Result<FarewellMessage>;
    async fn delete(&self, message_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait FarewellServiceTrait: Send + Sync {
    fn get_messages(&self, active_only: bool) -> Result<Vec<FarewellMessage>>;
    /// A random active message, or `None` when there is none.
    fn pick_checkout_message(&self) -> Result<Option<FarewellMessage>>;
    async fn create_message(&self, new_message: NewFarewellMessage) -> Result<FarewellMessage>;
    async fn update_message(
        &self,
        message_id: &str,
        update: FarewellMessageUpdate,
    ) -> Result<FarewellMessage>;
    async fn delete_message(&self, message_id: &str) -> Result<()>;
}
