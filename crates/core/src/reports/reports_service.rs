use chrono::Utc;
use std::sync::Arc;

use super::reports_model::{Dashboard, ReportRange, SalesSummary, TopProduct};
use super::reports_traits::{ReportRepositoryTrait, ReportServiceTrait};
use crate::errors::Result;
use crate::inventory::InventoryRepositoryTrait;
use crate::notifications::NotificationRepositoryTrait;

const DEFAULT_TOP_PRODUCTS: i64 = 10;
const MAX_TOP_PRODUCTS: i64 = 100;

pub struct ReportService {
    repository: Arc<dyn ReportRepositoryTrait>,
    inventory_repository: Arc<dyn InventoryRepositoryTrait>,
    notification_repository: Arc<dyn NotificationRepositoryTrait>,
}

impl ReportService {
    pub fn new(
        repository: Arc<dyn ReportRepositoryTrait>,
        inventory_repository: Arc<dyn InventoryRepositoryTrait>,
        notification_repository: Arc<dyn NotificationRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            inventory_repository,
            notification_repository,
        }
    }
}

impl ReportServiceTrait for ReportService {
    fn sales_summary(&self, range: ReportRange) -> Result<SalesSummary> {
        let (from, to) = range.resolve(Utc::now().date_naive())?;
        let (start, end) = ReportRange::bounds(from, to);
        let totals = self.repository.sales_totals(start, end)?;
        Ok(SalesSummary::new(from, to, totals))
    }

    fn top_products(&self, range: ReportRange, limit: Option<i64>) -> Result<Vec<TopProduct>> {
        let (from, to) = range.resolve(Utc::now().date_naive())?;
        let (start, end) = ReportRange::bounds(from, to);
        let limit = limit
            .unwrap_or(DEFAULT_TOP_PRODUCTS)
            .clamp(1, MAX_TOP_PRODUCTS);
        self.repository.top_products(start, end, limit)
    }

    fn dashboard(&self) -> Result<Dashboard> {
        Ok(Dashboard {
            today: self.sales_summary(ReportRange::default())?,
            inventory: self.inventory_repository.get_summary()?,
            unread_notifications: self.notification_repository.unread_count()?,
        })
    }
}
