use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use retailpos_core::{
    products::{NewProduct, Product, ProductSearch, ProductServiceTrait, ProductUpdate},
    users::Permission,
    utils::pagination::Paginated,
};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

async fn search_products(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(search): Query<ProductSearch>,
) -> ApiResult<Json<Paginated<Product>>> {
    current.require(Permission::ViewProducts)?;
    Ok(Json(state.product_service.search_products(search)?))
}

async fn get_product(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Product>> {
    current.require(Permission::ViewProducts)?;
    Ok(Json(state.product_service.get_product(&id)?))
}

async fn get_product_by_sku(
    Path(sku): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Product>> {
    current.require(Permission::ViewProducts)?;
    Ok(Json(state.product_service.get_product_by_sku(&sku)?))
}

async fn get_low_stock_products(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<Product>>> {
    current.require(Permission::ViewProducts)?;
    Ok(Json(state.product_service.get_low_stock_products()?))
}

async fn get_reorder_products(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<Product>>> {
    current.require(Permission::ViewProducts)?;
    Ok(Json(state.product_service.get_reorder_products()?))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    current.require(Permission::ManageProducts)?;
    let created = state
        .product_service
        .create_product(payload, Some(current.id.clone()))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_product(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(payload): Json<ProductUpdate>,
) -> ApiResult<Json<Product>> {
    current.require(Permission::ManageProducts)?;
    Ok(Json(state.product_service.update_product(&id, payload).await?))
}

/// 204 when the row was removed, 200 with the deactivated product when its
/// sales history forced a soft delete.
async fn delete_product(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Response> {
    current.require(Permission::ManageProducts)?;
    match state.product_service.delete_product(&id).await? {
        Some(deactivated) => Ok(Json(deactivated).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(search_products).post(create_product))
        .route("/products/low-stock", get(get_low_stock_products))
        .route("/products/reorder", get(get_reorder_products))
        .route("/products/sku/{sku}", get(get_product_by_sku))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}
