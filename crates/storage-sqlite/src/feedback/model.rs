use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::to_utc;
use retailpos_core::feedback::CustomerFeedback;

#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::feedback)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FeedbackDB {
    pub id: String,
    pub transaction_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<FeedbackDB> for CustomerFeedback {
    fn from(db: FeedbackDB) -> Self {
        Self {
            id: db.id,
            transaction_id: db.transaction_id,
            customer_name: db.customer_name,
            customer_email: db.customer_email,
            rating: db.rating,
            comment: db.comment,
            created_at: to_utc(db.created_at),
        }
    }
}
