use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::record_activity,
    colors::Color,
    dto::products::{CreateProductRequest, ProductList, ProductStats},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Product, Role},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder, StockFilter},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::ProductCode).ilike(pattern)),
        );
    }

    if let Some(color) = query
        .color
        .as_ref()
        .filter(|c| !c.is_empty() && c.as_str() != "all")
    {
        let color = Color::from_key(color)
            .ok_or_else(|| AppError::BadRequest(format!("unknown color '{color}'")))?;
        condition = condition.add(Column::Color.eq(color.key()));
    }

    condition = match query.stock.unwrap_or(StockFilter::All) {
        StockFilter::All => condition,
        StockFilter::Available => condition.add(Column::TotalStock.gt(0)),
        StockFilter::Low => condition
            .add(Column::TotalStock.gt(0))
            .add(Column::TotalStock.lt(LOW_STOCK_THRESHOLD)),
        StockFilter::Out => condition.add(Column::TotalStock.eq(0)),
    };

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    let data = ProductList { items };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = fetch_product(state, id).await?;
    Ok(ApiResponse::success("Product", product, None))
}

/// Fresh read of one product as a domain value; NotFound when missing.
pub async fn fetch_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    let model = Products::find_by_id(id).one(&state.orm).await?;
    match model {
        Some(model) => product_from_entity(model),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if payload.total_stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }

    let sequence = Products::find().count(&state.orm).await? as i64 + 1;
    let prefix = match user.role {
        Role::Seller(channel) => channel.code_prefix(),
        Role::Manager => "GD",
    };
    let product_code = build_product_code(prefix, sequence, payload.color);

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        product_code: Set(product_code),
        name: Set(payload.name),
        price: Set(payload.price),
        total_stock: Set(payload.total_stock),
        tiktok_stock: Set(0),
        shopee_stock: Set(0),
        toko_stock: Set(0),
        color: Set(payload.color.key().to_string()),
        created_at: NotSet,
    };
    let model = active.insert(&state.orm).await?;

    record_activity(
        &state.pool,
        "Penambahan produk",
        &format!(
            "Produk {} warna {} dibuat dengan stok gudang {}",
            model.product_code,
            payload.color.display_name(),
            model.total_stock
        ),
    )
    .await?;

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(model)?,
        Some(Meta::empty()),
    ))
}

pub async fn product_stats(state: &AppState) -> AppResult<ApiResponse<ProductStats>> {
    let row: (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*),
               COALESCE(SUM(price * total_stock), 0)::BIGINT,
               COUNT(*) FILTER (WHERE total_stock > 0 AND total_stock < $1),
               COUNT(*) FILTER (WHERE total_stock = 0)
        FROM products
        "#,
    )
    .bind(LOW_STOCK_THRESHOLD)
    .fetch_one(&state.pool)
    .await?;

    let stats = ProductStats {
        total_products: row.0,
        total_value: row.1,
        low_stock_count: row.2,
        out_of_stock_count: row.3,
    };
    Ok(ApiResponse::success("Stats", stats, Some(Meta::empty())))
}

pub const LOW_STOCK_THRESHOLD: i32 = 10;

pub(crate) fn product_from_entity(model: ProductModel) -> AppResult<Product> {
    let color = Color::from_key(&model.color).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "product {} has unknown color key '{}'",
            model.id,
            model.color
        ))
    })?;
    Ok(Product {
        id: model.id,
        product_code: model.product_code,
        name: model.name,
        price: model.price,
        total_stock: model.total_stock,
        tiktok_stock: model.tiktok_stock,
        shopee_stock: model.shopee_stock,
        toko_stock: model.toko_stock,
        color,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

/// Code layout: channel prefix, creation sequence, zero-padded palette index
/// of the color.
fn build_product_code(prefix: &str, sequence: i64, color: Color) -> String {
    format!("{}-{}-{:02}", prefix, sequence, color.palette_index())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_code_embeds_prefix_sequence_and_color_index() {
        assert_eq!(build_product_code("TT", 1, Color::BurgundiMaron), "TT-1-00");
        assert_eq!(build_product_code("SH", 42, Color::Lilak), "SH-42-15");
        assert_eq!(build_product_code("GD", 7, Color::RoseGold), "GD-7-06");
    }
}
