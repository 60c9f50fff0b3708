use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::users::normalize_email;
use crate::utils::money::round_money;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFeedback {
    pub id: String,
    pub transaction_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    pub transaction_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
}

fn clean_optional(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

impl NewFeedback {
    pub fn validate(&mut self) -> Result<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(Error::Validation(ValidationError::field(
                "rating",
                format!("must be between {} and {}", MIN_RATING, MAX_RATING),
            )));
        }
        self.transaction_id = clean_optional(self.transaction_id.take());
        self.customer_name = clean_optional(self.customer_name.take());
        self.comment = clean_optional(self.comment.take());
        self.customer_email = match clean_optional(self.customer_email.take()) {
            Some(email) => Some(normalize_email("customerEmail", &email)?),
            None => None,
        };
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackQuery {
    pub min_rating: Option<i32>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingCount {
    pub rating: i32,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub count: i64,
    /// Rounded to two decimals; `None` when there is no feedback yet.
    pub average_rating: Option<Decimal>,
    /// One entry per star, 1 through 5.
    pub distribution: Vec<RatingCount>,
}

impl FeedbackStats {
    /// Builds the stats from per-rating counts. Missing ratings count as zero.
    pub fn from_counts(counts: &[(i32, i64)]) -> Self {
        let distribution: Vec<RatingCount> = (MIN_RATING..=MAX_RATING)
            .map(|rating| RatingCount {
                rating,
                count: counts
                    .iter()
                    .filter(|(r, _)| *r == rating)
                    .map(|(_, c)| c)
                    .sum(),
            })
            .collect();
        let count: i64 = distribution.iter().map(|d| d.count).sum();
        let weighted: i64 = distribution
            .iter()
            .map(|d| i64::from(d.rating) * d.count)
            .sum();
        let average_rating = if count == 0 {
            None
        } else {
            Some(round_money(Decimal::from(weighted) / Decimal::from(count)))
        };
        Self {
            count,
            average_rating,
            distribution,
        }
    }
}
