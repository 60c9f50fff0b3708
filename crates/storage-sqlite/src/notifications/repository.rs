use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use std::sync::Arc;
use uuid::Uuid;

use super::model::NotificationDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::notifications;
use crate::utils::now_naive;
use retailpos_core::notifications::{
    NewNotification, Notification, NotificationQuery, NotificationRepositoryTrait,
};
use retailpos_core::utils::pagination::{normalize_page, page_offset, Paginated};
use retailpos_core::Result;

pub struct NotificationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl NotificationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn filtered(query: &NotificationQuery) -> notifications::BoxedQuery<'static, Sqlite> {
    let mut boxed = notifications::table.into_boxed();
    if query.unread_only {
        boxed = boxed.filter(notifications::is_read.eq(false));
    }
    boxed
}

#[async_trait]
impl NotificationRepositoryTrait for NotificationRepository {
    fn list(&self, query: &NotificationQuery) -> Result<Paginated<Notification>> {
        let mut conn = get_connection(&self.pool)?;
        let (page, page_size) = normalize_page(query.page, query.page_size);

        let total: i64 = filtered(query).count().get_result(&mut conn).into_core()?;
        let rows = filtered(query)
            .select(NotificationDB::as_select())
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .limit(page_size)
            .offset(page_offset(page, page_size))
            .load(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Notification::from).collect(),
            page,
            page_size,
            total,
        ))
    }

    fn unread_count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        notifications::table
            .filter(notifications::is_read.eq(false))
            .count()
            .get_result(&mut conn)
            .into_core()
    }

    async fn create_many(&self, new_notifications: Vec<NewNotification>) -> Result<Vec<Notification>> {
        if new_notifications.is_empty() {
            return Ok(Vec::new());
        }
        let now = now_naive();
        let rows: Vec<NotificationDB> = new_notifications
            .into_iter()
            .map(|n| NotificationDB {
                id: Uuid::new_v4().to_string(),
                kind: n.kind.as_str().to_string(),
                title: n.title,
                message: n.message,
                product_id: n.product_id,
                transaction_id: n.transaction_id,
                recipient: n.recipient,
                is_read: false,
                created_at: now,
            })
            .collect();
        self.writer
            .exec(move |conn| {
                diesel::insert_into(notifications::table)
                    .values(&rows)
                    .execute(conn)
                    .into_core()?;
                Ok(rows.into_iter().map(Notification::from).collect())
            })
            .await
    }

    async fn mark_read(&self, notification_id: &str) -> Result<usize> {
        let notification_id = notification_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(notifications::table.find(notification_id))
                    .set(notifications::is_read.eq(true))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn mark_all_read(&self) -> Result<usize> {
        self.writer
            .exec(|conn| {
                diesel::update(notifications::table.filter(notifications::is_read.eq(false)))
                    .set(notifications::is_read.eq(true))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
