use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use retailpos_core::{
    settings::{Settings, SettingsServiceTrait, SettingsUpdate},
    users::Permission,
};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

/// Store details are shown on every till, so any signed-in user may read them.
async fn get_settings(
    State(state): State<Arc<AppState>>,
    _current: CurrentUser,
) -> ApiResult<Json<Settings>> {
    Ok(Json(state.settings_service.get_settings()?))
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<SettingsUpdate>,
) -> ApiResult<Json<Settings>> {
    current.require(Permission::ManageSettings)?;
    Ok(Json(state.settings_service.update_settings(payload).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}
