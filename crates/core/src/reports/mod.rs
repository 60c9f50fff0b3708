//! Sales and inventory reporting (numbers only).

mod reports_model;
mod reports_service;
mod reports_traits;

pub use reports_model::{Dashboard, ReportRange, SalesSummary, SalesTotals, TopProduct};
pub use reports_service::ReportService;
pub use reports_traits::{ReportRepositoryTrait, ReportServiceTrait};
