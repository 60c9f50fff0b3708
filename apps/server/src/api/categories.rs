use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use retailpos_core::{
    categories::{Category, CategoryServiceTrait, NewCategory},
    users::Permission,
};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

async fn list_categories(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<Category>>> {
    current.require(Permission::ViewProducts)?;
    Ok(Json(state.category_service.get_categories()?))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    current.require(Permission::ManageCategories)?;
    let created = state.category_service.create_category(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<NewCategory>,
) -> ApiResult<Json<Category>> {
    current.require(Permission::ManageCategories)?;
    Ok(Json(
        state.category_service.update_category(&id, payload).await?,
    ))
}

/// Products in the category are kept and left uncategorised.
async fn delete_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<StatusCode> {
    current.require(Permission::ManageCategories)?;
    state.category_service.delete_category(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
}
