use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use retailpos_core::{
    farewell::{FarewellMessage, FarewellMessageUpdate, FarewellServiceTrait, NewFarewellMessage},
    users::Permission,
};

use crate::{
    auth::CurrentUser, error::ApiResult, main_lib::AppState, models::FarewellListQuery,
};

async fn list_messages(
    State(state): State<Arc<AppState>>,
    _current: CurrentUser,
    Query(query): Query<FarewellListQuery>,
) -> ApiResult<Json<Vec<FarewellMessage>>> {
    Ok(Json(state.farewell_service.get_messages(query.active_only)?))
}

/// A random active message for the checkout screen, or `null`.
async fn checkout_message(
    State(state): State<Arc<AppState>>,
    _current: CurrentUser,
) -> ApiResult<Json<Option<FarewellMessage>>> {
    Ok(Json(state.farewell_service.pick_checkout_message()?))
}

async fn create_message(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<NewFarewellMessage>,
) -> ApiResult<(StatusCode, Json<FarewellMessage>)> {
    current.require(Permission::ManageFarewellMessages)?;
    let created = state.farewell_service.create_message(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_message(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<FarewellMessageUpdate>,
) -> ApiResult<Json<FarewellMessage>> {
    current.require(Permission::ManageFarewellMessages)?;
    Ok(Json(
        state.farewell_service.update_message(&id, payload).await?,
    ))
}

async fn delete_message(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<StatusCode> {
    current.require(Permission::ManageFarewellMessages)?;
    state.farewell_service.delete_message(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/farewell-messages",
            get(list_messages).post(create_message),
        )
        .route("/farewell-messages/checkout", get(checkout_message))
        .route(
            "/farewell-messages/{id}",
            put(update_message).delete(delete_message),
        )
}
