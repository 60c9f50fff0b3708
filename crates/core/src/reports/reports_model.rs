use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::inventory::InventorySummary;
use crate::utils::money::round_money;
use crate::utils::time_utils::{end_of_day_exclusive, start_of_day};

/// Inclusive date range; both ends default to `today`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportRange {
    pub fn resolve(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let from = self.from.unwrap_or(today);
        let to = self.to.unwrap_or(today);
        if from > to {
            return Err(Error::invalid_input("'from' must not be after 'to'"));
        }
        Ok((from, to))
    }

    /// Half-open UTC timestamp bounds of a resolved range.
    pub fn bounds(from: NaiveDate, to: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        (start_of_day(from), end_of_day_exclusive(to))
    }
}

/// Raw aggregates read from storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTotals {
    pub completed_count: i64,
    pub cancelled_count: i64,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub completed_count: i64,
    pub cancelled_count: i64,
    pub gross_subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub average_ticket: Decimal,
}

impl SalesSummary {
    pub fn new(from: NaiveDate, to: NaiveDate, totals: SalesTotals) -> Self {
        let average_ticket = if totals.completed_count == 0 {
            Decimal::ZERO
        } else {
            round_money(totals.total / Decimal::from(totals.completed_count))
        };
        Self {
            from,
            to,
            completed_count: totals.completed_count,
            cancelled_count: totals.cancelled_count,
            gross_subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            average_ticket,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub sku: String,
    pub product_name: String,
    pub quantity_sold: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: SalesSummary,
    pub inventory: InventorySummary,
    pub unread_notifications: i64,
}
