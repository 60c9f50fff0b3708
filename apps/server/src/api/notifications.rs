use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use retailpos_core::{
    notifications::{Notification, NotificationQuery, NotificationServiceTrait},
    users::Permission,
    utils::pagination::Paginated,
};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState, models::CountResponse};

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<Json<Paginated<Notification>>> {
    current.require(Permission::ViewNotifications)?;
    Ok(Json(state.notification_service.list_notifications(query)?))
}

async fn unread_count(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<CountResponse>> {
    current.require(Permission::ViewNotifications)?;
    Ok(Json(CountResponse {
        count: state.notification_service.unread_count()?,
    }))
}

async fn mark_read(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<StatusCode> {
    current.require(Permission::ViewNotifications)?;
    state.notification_service.mark_read(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<CountResponse>> {
    current.require(Permission::ViewNotifications)?;
    let updated = state.notification_service.mark_all_read().await?;
    Ok(Json(CountResponse {
        count: updated as i64,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/{id}/read", post(mark_read))
}
