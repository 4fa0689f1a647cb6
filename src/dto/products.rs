use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{colors::Color, models::Product};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: i64,
    pub total_stock: i32,
    pub color: Color,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

/// Aggregates for the dashboard header cards.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductStats {
    pub total_products: i64,
    /// Sum of price * total_stock over all products.
    pub total_value: i64,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
}
