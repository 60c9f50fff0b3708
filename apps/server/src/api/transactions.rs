use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use retailpos_core::{
    transactions::{
        CancelTransaction, NewTransaction, Receipt, Transaction, TransactionSearch,
        TransactionServiceTrait,
    },
    users::Permission,
    utils::pagination::Paginated,
};

use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Cashiers only see the sales they rang up.
fn ensure_visible(current: &CurrentUser, transaction: &Transaction) -> ApiResult<()> {
    if current.can(Permission::ViewReports) || transaction.user_id == current.id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You can only view your own transactions".to_string(),
        ))
    }
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    current.require(Permission::CreateSale)?;
    let transaction = state
        .transaction_service
        .create_transaction(payload, &current.id)
        .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn search_transactions(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(mut search): Json<TransactionSearch>,
) -> ApiResult<Json<Paginated<Transaction>>> {
    current.require(Permission::CreateSale)?;
    if !current.can(Permission::ViewReports) {
        search.user_id = Some(current.id.clone());
    }
    Ok(Json(state.transaction_service.search_transactions(search)?))
}

async fn get_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Transaction>> {
    let transaction = state.transaction_service.get_transaction(&id)?;
    ensure_visible(&current, &transaction)?;
    Ok(Json(transaction))
}

async fn cancel_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<CancelTransaction>,
) -> ApiResult<Json<Transaction>> {
    current.require(Permission::CancelSale)?;
    let cancelled = state
        .transaction_service
        .cancel_transaction(&id, payload, &current.id)
        .await?;
    Ok(Json(cancelled))
}

async fn get_receipt(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Receipt>> {
    let receipt = state.transaction_service.get_receipt(&id)?;
    ensure_visible(&current, &receipt.transaction)?;
    Ok(Json(receipt))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/transactions", post(create_transaction))
        .route("/transactions/search", post(search_transactions))
        .route("/transactions/{id}", get(get_transaction))
        .route("/transactions/{id}/cancel", post(cancel_transaction))
        .route("/transactions/{id}/receipt", get(get_receipt))
}
