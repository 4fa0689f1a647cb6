use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::inventory::{AddStockRequest, DistributeStockRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Product,
    response::ApiResponse,
    services::inventory_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/distribute", post(distribute_stock))
        .route("/{id}/add-stock", post(add_stock))
}

#[utoipa::path(
    post,
    path = "/api/inventory/{id}/distribute",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = DistributeStockRequest,
    responses(
        (status = 200, description = "Stock moved into channel allocations", body = ApiResponse<Product>),
        (status = 400, description = "Empty or negative allocation"),
        (status = 409, description = "Allocations exceed warehouse stock"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn distribute_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DistributeStockRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let response = inventory_service::distribute_stock(&state, &user, id, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/inventory/{id}/add-stock",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = AddStockRequest,
    responses(
        (status = 200, description = "Warehouse stock increased", body = ApiResponse<Product>),
        (status = 400, description = "Amount not positive"),
    ),
    security(("bearer_auth" = [])),
    tag = "Inventory"
)]
pub async fn add_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddStockRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let response = inventory_service::add_stock(&state, &user, id, payload).await?;
    Ok(Json(response))
}
