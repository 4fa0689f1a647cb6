use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::record_activity,
    dto::inventory::{AddStockRequest, DistributeStockRequest},
    entity::products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_manager},
    models::{Channel, Product},
    response::{ApiResponse, Meta},
    services::product_service::product_from_entity,
    state::AppState,
};

/// Move warehouse stock into per-channel allocations. Rejected without any
/// mutation when the requested sum is zero or exceeds the current warehouse
/// pool.
pub async fn distribute_stock(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: DistributeStockRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_manager(user)?;
    let allocations = payload.allocations();

    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let sum = validate_allocations(product.total_stock, &allocations)?;

    let new_total = product.total_stock - sum;
    let mut tiktok = product.tiktok_stock;
    let mut shopee = product.shopee_stock;
    let mut toko = product.toko_stock;
    for (channel, amount) in allocations {
        let slot = match channel {
            Channel::Tiktok => &mut tiktok,
            Channel::Shopee => &mut shopee,
            Channel::Toko => &mut toko,
        };
        *slot = slot.checked_add(amount).ok_or_else(|| {
            AppError::BadRequest(format!("allocation overflows {} stock", channel))
        })?;
    }

    let mut active: ProductActive = product.into();
    active.total_stock = Set(new_total);
    active.tiktok_stock = Set(tiktok);
    active.shopee_stock = Set(shopee);
    active.toko_stock = Set(toko);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    record_activity(
        &state.pool,
        "Pemindahan stok",
        &format!(
            "Produk {}: stok gudang {} | tiktok {} | shopee {} | toko {}",
            updated.product_code,
            updated.total_stock,
            updated.tiktok_stock,
            updated.shopee_stock,
            updated.toko_stock
        ),
    )
    .await?;

    Ok(ApiResponse::success(
        "Stock distributed",
        product_from_entity(updated)?,
        Some(Meta::empty()),
    ))
}

pub async fn add_stock(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AddStockRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_manager(user)?;
    if payload.amount <= 0 {
        return Err(AppError::BadRequest(
            "amount must be greater than 0".to_string(),
        ));
    }

    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let new_total = product
        .total_stock
        .checked_add(payload.amount)
        .ok_or_else(|| AppError::BadRequest("amount overflows warehouse stock".to_string()))?;
    let mut active: ProductActive = product.into();
    active.total_stock = Set(new_total);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    record_activity(
        &state.pool,
        "Penambahan stok",
        &format!(
            "Produk {}: stok gudang ditambah {} menjadi {}",
            updated.product_code, payload.amount, new_total
        ),
    )
    .await?;

    Ok(ApiResponse::success(
        "Stock added",
        product_from_entity(updated)?,
        Some(Meta::empty()),
    ))
}

#[derive(Debug, Clone)]
pub struct DecrementOutcome {
    pub product_id: Uuid,
    pub product_code: String,
    pub quantity: i32,
    pub stock_before: i32,
    pub stock_after: i32,
}

/// Checkout-time decrement of one channel allocation. Reads the product
/// fresh, then subtracts relative to the stored value with a guard in the
/// UPDATE itself so the allocation can never go negative, even when two
/// checkouts race on the same product.
pub async fn decrement_channel_stock(
    state: &AppState,
    id: Uuid,
    channel: Channel,
    amount: i32,
) -> AppResult<DecrementOutcome> {
    if amount <= 0 {
        return Err(AppError::BadRequest(
            "amount must be greater than 0".to_string(),
        ));
    }

    let product = Products::find_by_id(id).one(&state.orm).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let column = channel_column(channel);
    let before = match channel {
        Channel::Tiktok => product.tiktok_stock,
        Channel::Shopee => product.shopee_stock,
        Channel::Toko => product.toko_stock,
    };
    if before < amount {
        return Err(AppError::InsufficientStock(format!(
            "product {} has {} on {} but {} requested",
            product.product_code, before, channel, amount
        )));
    }

    let result = Products::update_many()
        .col_expr(column, Expr::col(column).sub(amount))
        .filter(ProdCol::Id.eq(id))
        .filter(column.gte(amount))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        // A concurrent checkout drained the allocation between our read and
        // the guarded update.
        return Err(AppError::InsufficientStock(format!(
            "product {} ran out on {} during checkout",
            product.product_code, channel
        )));
    }

    let after = before - amount;
    record_activity(
        &state.pool,
        &format!("Pembelian di {}", channel),
        &format!(
            "Produk {} ({}): stok {} berkurang {} -> {}",
            product.id, product.product_code, channel, before, after
        ),
    )
    .await?;

    Ok(DecrementOutcome {
        product_id: product.id,
        product_code: product.product_code,
        quantity: amount,
        stock_before: before,
        stock_after: after,
    })
}

fn channel_column(channel: Channel) -> ProdCol {
    match channel {
        Channel::Tiktok => ProdCol::TiktokStock,
        Channel::Shopee => ProdCol::ShopeeStock,
        Channel::Toko => ProdCol::TokoStock,
    }
}

/// Allocation sum for a distribution, rejecting negative entries, an empty
/// request, and anything past the warehouse pool. Summed in i64 so a request
/// near i32::MAX cannot wrap past the capacity check.
fn validate_allocations(total_stock: i32, allocations: &[(Channel, i32)]) -> AppResult<i32> {
    let mut sum: i64 = 0;
    for (channel, amount) in allocations {
        if *amount < 0 {
            return Err(AppError::BadRequest(format!(
                "allocation for {} must not be negative",
                channel
            )));
        }
        sum += i64::from(*amount);
    }
    if sum == 0 {
        return Err(AppError::BadRequest(
            "nothing to distribute: all allocations are 0".to_string(),
        ));
    }
    if sum > i64::from(total_stock) {
        return Err(AppError::InsufficientStock(format!(
            "requested {} units but only {} in the warehouse",
            sum, total_stock
        )));
    }
    // Fits: the sum is bounded by total_stock.
    Ok(sum as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_sum_accepts_partial_channels() {
        let allocations = [
            (Channel::Tiktok, 30),
            (Channel::Shopee, 0),
            (Channel::Toko, 0),
        ];
        assert_eq!(validate_allocations(100, &allocations).unwrap(), 30);
    }

    #[test]
    fn zero_sum_is_a_no_op_error() {
        let allocations = [
            (Channel::Tiktok, 0),
            (Channel::Shopee, 0),
            (Channel::Toko, 0),
        ];
        assert!(matches!(
            validate_allocations(100, &allocations),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn over_capacity_is_rejected() {
        let allocations = [
            (Channel::Tiktok, 60),
            (Channel::Shopee, 50),
            (Channel::Toko, 0),
        ];
        assert!(matches!(
            validate_allocations(100, &allocations),
            Err(AppError::InsufficientStock(_))
        ));
    }

    #[test]
    fn negative_allocation_is_rejected() {
        let allocations = [
            (Channel::Tiktok, -1),
            (Channel::Shopee, 5),
            (Channel::Toko, 0),
        ];
        assert!(matches!(
            validate_allocations(100, &allocations),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn allocation_sum_near_i32_max_does_not_wrap() {
        let allocations = [
            (Channel::Tiktok, i32::MAX),
            (Channel::Shopee, 1),
            (Channel::Toko, 0),
        ];
        assert!(matches!(
            validate_allocations(100, &allocations),
            Err(AppError::InsufficientStock(_))
        ));
    }

    #[test]
    fn exact_capacity_is_allowed() {
        let allocations = [
            (Channel::Tiktok, 40),
            (Channel::Shopee, 30),
            (Channel::Toko, 30),
        ];
        assert_eq!(validate_allocations(100, &allocations).unwrap(), 100);
    }
}
