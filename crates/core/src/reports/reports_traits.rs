use chrono::{DateTime, Utc};

use super::reports_model::{Dashboard, ReportRange, SalesSummary, SalesTotals, TopProduct};
use crate::errors::Result;

/// Read-only aggregate queries over `[from, to)`.
pub trait ReportRepositoryTrait: Send + Sync {
    fn sales_totals(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<SalesTotals>;
    /// Completed sales only, highest quantity first.
    fn top_products(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<TopProduct>>;
}

pub trait ReportServiceTrait: Send + Sync {
    fn sales_summary(&self, range: ReportRange) -> Result<SalesSummary>;
    fn top_products(&self, range: ReportRange, limit: Option<i64>) -> Result<Vec<TopProduct>>;
    fn dashboard(&self) -> Result<Dashboard>;
}
