use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use retailpos_core::{
    inventory::{
        InventoryMovement, InventoryServiceTrait, InventorySummary, MovementQuery,
        StockAdjustment, StockAdjustmentResult,
    },
    users::Permission,
    utils::pagination::Paginated,
};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

async fn adjust_stock(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<StockAdjustment>,
) -> ApiResult<(StatusCode, Json<StockAdjustmentResult>)> {
    current.require(Permission::AdjustStock)?;
    let result = state
        .inventory_service
        .adjust_stock(payload, Some(current.id.clone()))
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn list_movements(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<MovementQuery>,
) -> ApiResult<Json<Paginated<InventoryMovement>>> {
    current.require(Permission::AdjustStock)?;
    Ok(Json(state.inventory_service.list_movements(query)?))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<InventorySummary>> {
    current.require(Permission::ViewReports)?;
    Ok(Json(state.inventory_service.get_summary()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/inventory/adjustments", post(adjust_stock))
        .route("/inventory/movements", get(list_movements))
        .route("/inventory/summary", get(get_summary))
}
