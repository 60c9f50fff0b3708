use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::sync::Arc;

use super::farewell_model::{FarewellMessage, FarewellMessageUpdate, NewFarewellMessage};
use super::farewell_traits::{FarewellRepositoryTrait, FarewellServiceTrait};
use crate::errors::{Error, Result};

pub struct FarewellService {
    repository: Arc<dyn FarewellRepositoryTrait>,
}

impl FarewellService {
    pub fn new(repository: Arc<dyn FarewellRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl FarewellServiceTrait for FarewellService {
    fn get_messages(&self, active_only: bool) -> Result<Vec<FarewellMessage>> {
        self.repository.list(active_only)
    }

    fn pick_checkout_message(&self) -> Result<Option<FarewellMessage>> {
        let active = self.repository.list(true)?;
        Ok(active.choose(&mut rand::thread_rng()).cloned())
    }

    async fn create_message(&self, mut new_message: NewFarewellMessage) -> Result<FarewellMessage> {
        new_message.validate()?;
        self.repository.create(new_message).await
    }

    async fn update_message(
        &self,
        message_id: &str,
        mut update: FarewellMessageUpdate,
    ) -> Result<FarewellMessage> {
        update.validate()?;
        self.repository.get_by_id(message_id)?;
        self.repository.update(message_id, update).await
    }

    async fn delete_message(&self, message_id: &str) -> Result<()> {
        if self.repository.delete(message_id).await? == 0 {
            return Err(Error::not_found("FarewellMessage", message_id));
        }
        Ok(())
    }
}
