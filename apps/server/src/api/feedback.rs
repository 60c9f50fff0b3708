use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use retailpos_core::{
    feedback::{CustomerFeedback, FeedbackQuery, FeedbackServiceTrait, FeedbackStats, NewFeedback},
    users::Permission,
    utils::pagination::Paginated,
};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

/// Any signed-in till may record feedback on behalf of the customer.
async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    _current: CurrentUser,
    Json(payload): Json<NewFeedback>,
) -> ApiResult<(StatusCode, Json<CustomerFeedback>)> {
    let feedback = state.feedback_service.submit_feedback(payload).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

async fn list_feedback(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<FeedbackQuery>,
) -> ApiResult<Json<Paginated<CustomerFeedback>>> {
    current.require(Permission::ViewFeedback)?;
    Ok(Json(state.feedback_service.list_feedback(query)?))
}

async fn get_feedback_stats(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<FeedbackStats>> {
    current.require(Permission::ViewFeedback)?;
    Ok(Json(state.feedback_service.get_feedback_stats()?))
}

async fn delete_feedback(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<StatusCode> {
    current.require(Permission::DeleteFeedback)?;
    state.feedback_service.delete_feedback(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/feedback", get(list_feedback).post(submit_feedback))
        .route("/feedback/stats", get(get_feedback_stats))
        .route("/feedback/{id}", delete(delete_feedback))
}
