use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use retailpos_core::{
    reports::{Dashboard, ReportRange, ReportServiceTrait, SalesSummary, TopProduct},
    users::Permission,
};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState, models::TopProductsQuery};

async fn sales_summary(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(range): Query<ReportRange>,
) -> ApiResult<Json<SalesSummary>> {
    current.require(Permission::ViewReports)?;
    Ok(Json(state.report_service.sales_summary(range)?))
}

async fn top_products(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<TopProductsQuery>,
) -> ApiResult<Json<Vec<TopProduct>>> {
    current.require(Permission::ViewReports)?;
    let range = ReportRange {
        from: query.from,
        to: query.to,
    };
    Ok(Json(state.report_service.top_products(range, query.limit)?))
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Dashboard>> {
    current.require(Permission::ViewReports)?;
    Ok(Json(state.report_service.dashboard()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports/sales-summary", get(sales_summary))
        .route("/reports/top-products", get(top_products))
        .route("/reports/dashboard", get(dashboard))
}
