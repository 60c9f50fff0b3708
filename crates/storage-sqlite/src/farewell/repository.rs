use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use super::model::FarewellMessageDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::farewell_messages;
use crate::utils::now_naive;
use retailpos_core::farewell::{
    FarewellMessage, FarewellMessageUpdate, FarewellRepositoryTrait, NewFarewellMessage,
};
use retailpos_core::Result;

pub struct FarewellRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FarewellRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FarewellRepositoryTrait for FarewellRepository {
    fn list(&self, active_only: bool) -> Result<Vec<FarewellMessage>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = farewell_messages::table.into_boxed();
        if active_only {
            query = query.filter(farewell_messages::is_active.eq(true));
        }
        let rows = query
            .select(FarewellMessageDB::as_select())
            .order(farewell_messages::created_at.asc())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(FarewellMessage::from).collect())
    }

    fn get_by_id(&self, message_id: &str) -> Result<FarewellMessage> {
        let mut conn = get_connection(&self.pool)?;
        farewell_messages::table
            .find(message_id)
            .select(FarewellMessageDB::as_select())
            .first(&mut conn)
            .or_not_found("FarewellMessage", message_id)
            .map(FarewellMessage::from)
    }

    async fn create(&self, new_message: NewFarewellMessage) -> Result<FarewellMessage> {
        let now = now_naive();
        let row = FarewellMessageDB {
            id: Uuid::new_v4().to_string(),
            message: new_message.message,
            is_active: new_message.is_active,
            created_at: now,
            updated_at: now,
        };
        self.writer
            .exec(move |conn| {
                diesel::insert_into(farewell_messages::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(FarewellMessage::from(row))
            })
            .await
    }

    async fn update(
        &self,
        message_id: &str,
        update: FarewellMessageUpdate,
    ) -> Result<FarewellMessage> {
        let message_id = message_id.to_string();
        self.writer
            .exec(move |conn| {
                let mut row: FarewellMessageDB = farewell_messages::table
                    .find(&message_id)
                    .select(FarewellMessageDB::as_select())
                    .first(conn)
                    .or_not_found("FarewellMessage", &message_id)?;
                if let Some(message) = update.message {
                    row.message = message;
                }
                if let Some(is_active) = update.is_active {
                    row.is_active = is_active;
                }
                row.updated_at = now_naive();

                diesel::update(farewell_messages::table.find(&message_id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(FarewellMessage::from(row))
            })
            .await
    }

    async fn delete(&self, message_id: &str) -> Result<usize> {
        let message_id = message_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(farewell_messages::table.find(message_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
