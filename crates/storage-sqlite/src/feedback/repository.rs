use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use std::sync::Arc;
use uuid::Uuid;

use super::model::FeedbackDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::feedback;
use crate::utils::now_naive;
use retailpos_core::feedback::{CustomerFeedback, FeedbackQuery, FeedbackRepositoryTrait, NewFeedback};
use retailpos_core::utils::pagination::{normalize_page, page_offset, Paginated};
use retailpos_core::Result;

pub struct FeedbackRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FeedbackRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn filtered(query: &FeedbackQuery) -> feedback::BoxedQuery<'static, Sqlite> {
    let mut boxed = feedback::table.into_boxed();
    if let Some(min_rating) = query.min_rating {
        boxed = boxed.filter(feedback::rating.ge(min_rating));
    }
    boxed
}

#[async_trait]
impl FeedbackRepositoryTrait for FeedbackRepository {
    fn list(&self, query: &FeedbackQuery) -> Result<Paginated<CustomerFeedback>> {
        let mut conn = get_connection(&self.pool)?;
        let (page, page_size) = normalize_page(query.page, query.page_size);

        let total: i64 = filtered(query).count().get_result(&mut conn).into_core()?;
        let rows = filtered(query)
            .select(FeedbackDB::as_select())
            .order((feedback::created_at.desc(), feedback::id.desc()))
            .limit(page_size)
            .offset(page_offset(page, page_size))
            .load(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(CustomerFeedback::from).collect(),
            page,
            page_size,
            total,
        ))
    }

    fn rating_counts(&self) -> Result<Vec<(i32, i64)>> {
        let mut conn = get_connection(&self.pool)?;
        feedback::table
            .group_by(feedback::rating)
            .select((feedback::rating, count_star()))
            .load::<(i32, i64)>(&mut conn)
            .into_core()
    }

    async fn create(&self, new_feedback: NewFeedback) -> Result<CustomerFeedback> {
        let row = FeedbackDB {
            id: Uuid::new_v4().to_string(),
            transaction_id: new_feedback.transaction_id,
            customer_name: new_feedback.customer_name,
            customer_email: new_feedback.customer_email,
            rating: new_feedback.rating,
            comment: new_feedback.comment,
            created_at: now_naive(),
        };
        self.writer
            .exec(move |conn| {
                diesel::insert_into(feedback::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(CustomerFeedback::from(row))
            })
            .await
    }

    async fn delete(&self, feedback_id: &str) -> Result<usize> {
        let feedback_id = feedback_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(feedback::table.find(feedback_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
