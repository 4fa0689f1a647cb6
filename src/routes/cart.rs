use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartView, CheckoutResponse},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart))
        .route("/lines", post(add_to_cart))
        .route("/lines/{product_id}", delete(remove_from_cart))
        .route("/checkout", post(checkout))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Current session cart", body = ApiResponse<CartView>),
        (status = 403, description = "Managers have no cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let response = cart_service::view_cart(&state, &user).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/cart/lines",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line appended", body = ApiResponse<CartView>),
        (status = 400, description = "Invalid quantity"),
        (status = 409, description = "Exceeds channel stock, or duplicate awaiting confirmation"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let response = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/cart/lines/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Lines for the product removed", body = ApiResponse<CartView>),
        (status = 404, description = "Product not in cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let response = cart_service::remove_from_cart(&state, &user, product_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/cart/checkout",
    responses(
        (status = 200, description = "All lines decremented, cart cleared", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Cart is empty"),
        (status = 409, description = "A line exceeded channel stock; applied lines stay applied"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CheckoutResponse>>> {
    let response = cart_service::checkout(&state, &user).await?;
    Ok(Json(response))
}
