use uuid::Uuid;

use crate::{
    cart::Cart,
    dto::cart::{AddToCartRequest, CartView, CheckoutLineResult, CheckoutResponse},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_seller},
    response::{ApiResponse, Meta},
    services::{inventory_service, product_service},
    state::{AppState, lock_carts},
};

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let channel = ensure_seller(user)?;
    let carts = lock_carts(&state.carts);
    let view = match carts.get(&user.user_id) {
        Some(cart) => CartView {
            channel: cart.channel(),
            lines: cart.lines().to_vec(),
            total: cart.total(),
        },
        None => CartView {
            channel,
            lines: Vec::new(),
            total: 0,
        },
    };
    Ok(ApiResponse::success("Cart", view, Some(Meta::empty())))
}

/// Validate against a fresh product read and append a line to the session's
/// cart. Touches neither the ledger nor the activity log.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let channel = ensure_seller(user)?;
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    // Fetch before taking the cart lock; the lock is never held across an
    // await.
    let product = product_service::fetch_product(state, payload.product_id).await?;

    let mut carts = lock_carts(&state.carts);
    let cart = carts
        .entry(user.user_id)
        .or_insert_with(|| Cart::new(channel));
    cart.add_line(&product, payload.quantity, payload.confirm_duplicate)?;

    let view = CartView {
        channel: cart.channel(),
        lines: cart.lines().to_vec(),
        total: cart.total(),
    };
    Ok(ApiResponse::success(
        "Added to cart",
        view,
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    ensure_seller(user)?;
    let mut carts = lock_carts(&state.carts);
    let cart = match carts.get_mut(&user.user_id) {
        Some(cart) => cart,
        None => return Err(AppError::NotFound),
    };
    if cart.remove_product(product_id) == 0 {
        return Err(AppError::NotFound);
    }
    let view = CartView {
        channel: cart.channel(),
        lines: cart.lines().to_vec(),
        total: cart.total(),
    };
    Ok(ApiResponse::success(
        "Removed from cart",
        view,
        Some(Meta::empty()),
    ))
}

/// Decrement every line's channel allocation. Line updates run concurrently
/// and are all awaited; any failure fails the checkout as a whole and names
/// the offending product. Decrements that already landed are not rolled
/// back, and the cart is kept so the caller can inspect and retry.
pub async fn checkout(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CheckoutResponse>> {
    let channel = ensure_seller(user)?;

    let (lines, total) = {
        let carts = lock_carts(&state.carts);
        match carts.get(&user.user_id) {
            Some(cart) if !cart.is_empty() => (cart.lines().to_vec(), cart.total()),
            _ => return Err(AppError::BadRequest("Cart is empty".to_string())),
        }
    };

    let mut handles = Vec::with_capacity(lines.len());
    for line in &lines {
        let state = state.clone();
        let line = line.clone();
        handles.push(tokio::spawn(async move {
            inventory_service::decrement_channel_stock(
                &state,
                line.product_id,
                line.channel,
                line.quantity,
            )
            .await
        }));
    }

    let mut results = Vec::with_capacity(lines.len());
    let mut failure: Option<AppError> = None;
    for (line, handle) in lines.iter().zip(handles) {
        match handle.await {
            Ok(Ok(outcome)) => results.push(outcome),
            Ok(Err(err)) => {
                tracing::error!(
                    product = %line.product_code,
                    error = %err,
                    "checkout line failed"
                );
                if failure.is_none() {
                    failure = Some(err);
                }
            }
            Err(join_err) => {
                if failure.is_none() {
                    failure = Some(AppError::Internal(anyhow::anyhow!(join_err)));
                }
            }
        }
    }

    if let Some(err) = failure {
        // Applied decrements stay applied; there is no compensating
        // transaction.
        return Err(err);
    }

    lock_carts(&state.carts).remove(&user.user_id);

    let response = CheckoutResponse {
        channel,
        total,
        lines: results
            .into_iter()
            .map(|outcome| CheckoutLineResult {
                product_id: outcome.product_id,
                product_code: outcome.product_code,
                quantity: outcome.quantity,
                stock_before: outcome.stock_before,
                stock_after: outcome.stock_after,
            })
            .collect(),
    };
    Ok(ApiResponse::success(
        "Checkout success",
        response,
        Some(Meta::empty()),
    ))
}
