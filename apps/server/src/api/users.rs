use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use retailpos_core::users::{Permission, UserServiceTrait};

use crate::{
    auth::CurrentUser,
    error::ApiResult,
    main_lib::AppState,
    models::{CreateUserRequest, UpdateUserRequest, UserDto},
};

#[utoipa::path(get, path = "/api/v1/users", responses((status = 200, body = [UserDto])))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<UserDto>>> {
    current.require(Permission::ManageUsers)?;
    let users = state.user_service.get_users()?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, body = UserDto))
)]
pub async fn get_user(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<UserDto>> {
    current.require(Permission::ManageUsers)?;
    Ok(Json(state.user_service.get_user(&id)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses((status = 201, body = UserDto))
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    current.require(Permission::ManageUsers)?;
    let created = state
        .user_service
        .create_user(payload.into_new_user()?)
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses((status = 200, body = UserDto))
)]
pub async fn update_user(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserDto>> {
    current.require(Permission::ManageUsers)?;
    let updated = state
        .user_service
        .update_user(&current.id, &id, payload.into_update()?)
        .await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses((status = 204))
)]
pub async fn delete_user(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<StatusCode> {
    current.require(Permission::ManageUsers)?;
    state.user_service.delete_user(&current.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
