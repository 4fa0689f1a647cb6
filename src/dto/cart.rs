use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cart::CartLine;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
    /// Set to true to append a second line for a product already in the
    /// cart; the first attempt is rejected so the user can decide.
    #[serde(default)]
    pub confirm_duplicate: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub channel: crate::models::Channel,
    pub lines: Vec<CartLine>,
    /// Sum of frozen unit prices times quantities.
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutLineResult {
    pub product_id: Uuid,
    pub product_code: String,
    pub quantity: i32,
    pub stock_before: i32,
    pub stock_after: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub channel: crate::models::Channel,
    pub total: i64,
    pub lines: Vec<CheckoutLineResult>,
}
