use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    colors::Color,
    error::{AppError, AppResult},
    models::{Channel, Product},
};

/// A pending reservation against one channel's stock. Price and stock are
/// frozen at add time; the snapshot is informational and is not re-validated
/// at checkout.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLine {
    pub product_id: Uuid,
    pub product_code: String,
    pub channel: Channel,
    pub quantity: i32,
    pub unit_price: i64,
    pub stock_snapshot: i32,
    pub color: Color,
}

impl CartLine {
    pub fn subtotal(&self) -> i64 {
        self.unit_price * i64::from(self.quantity)
    }
}

/// Session-held collection of cart lines, bound to a single channel. Lines
/// keep insertion order; checkout walks them in that order.
#[derive(Debug, Clone)]
pub struct Cart {
    channel: Channel,
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            lines: Vec::new(),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total over frozen unit prices, independent of later price changes on
    /// the underlying products.
    pub fn total(&self) -> i64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn contains_product(&self, product_id: Uuid) -> bool {
        self.lines.iter().any(|line| line.product_id == product_id)
    }

    /// Validate against the live product and append a line. A second line
    /// for a product already in the cart needs `confirm_duplicate`; this is
    /// a user decision point, not a silent merge.
    pub fn add_line(
        &mut self,
        product: &Product,
        quantity: i32,
        confirm_duplicate: bool,
    ) -> AppResult<()> {
        if quantity <= 0 {
            return Err(AppError::BadRequest(
                "quantity must be greater than 0".to_string(),
            ));
        }

        let available = product.channel_stock(self.channel);
        if quantity > available {
            return Err(AppError::InsufficientStock(format!(
                "requested {} of product {} but only {} available on {}",
                quantity, product.product_code, available, self.channel
            )));
        }

        if self.contains_product(product.id) && !confirm_duplicate {
            return Err(AppError::DuplicateCartLine(format!(
                "product {} is already in the cart",
                product.product_code
            )));
        }

        self.lines.push(CartLine {
            product_id: product.id,
            product_code: product.product_code.clone(),
            channel: self.channel,
            quantity,
            unit_price: product.price,
            stock_snapshot: available,
            color: product.color,
        });
        Ok(())
    }

    /// Remove every line for the given product. Returns how many were
    /// removed.
    pub fn remove_product(&mut self, product_id: Uuid) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        before - self.lines.len()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(price: i64, tiktok_stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            product_code: "TT-1-00".into(),
            name: "Gamis".into(),
            price,
            total_stock: 100,
            tiktok_stock,
            shopee_stock: 0,
            toko_stock: 0,
            color: Color::Sage,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rejects_zero_and_negative_quantity() {
        let mut cart = Cart::new(Channel::Tiktok);
        let p = product(1000, 30);
        assert!(matches!(
            cart.add_line(&p, 0, false),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            cart.add_line(&p, -3, false),
            Err(AppError::BadRequest(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn rejects_quantity_above_live_channel_stock() {
        let mut cart = Cart::new(Channel::Tiktok);
        let p = product(1000, 30);
        assert!(cart.add_line(&p, 10, false).is_ok());
        let err = cart.add_line(&product(1000, 30), 31, false).unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock(_)));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn duplicate_needs_confirmation_then_appends_second_line() {
        let mut cart = Cart::new(Channel::Tiktok);
        let p = product(1000, 30);
        cart.add_line(&p, 5, false).unwrap();
        assert!(matches!(
            cart.add_line(&p, 2, false),
            Err(AppError::DuplicateCartLine(_))
        ));
        cart.add_line(&p, 2, true).unwrap();
        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn total_uses_frozen_prices() {
        let mut cart = Cart::new(Channel::Tiktok);
        let mut p = product(1000, 30);
        cart.add_line(&p, 3, false).unwrap();
        // Price drifts after the line was added; the cart keeps the snapshot.
        p.price = 9999;
        cart.add_line(&p, 2, true).unwrap();
        assert_eq!(cart.total(), 3 * 1000 + 2 * 9999);
        p.price = 1;
        assert_eq!(cart.total(), 3 * 1000 + 2 * 9999);
    }

    #[test]
    fn snapshot_captures_channel_stock_at_add_time() {
        let mut cart = Cart::new(Channel::Tiktok);
        let p = product(500, 12);
        cart.add_line(&p, 4, false).unwrap();
        let line = cart.lines().last().unwrap();
        assert_eq!(line.stock_snapshot, 12);
        assert_eq!(line.unit_price, 500);
    }

    #[test]
    fn remove_product_drops_all_its_lines() {
        let mut cart = Cart::new(Channel::Toko);
        let mut p = product(100, 0);
        p.toko_stock = 50;
        cart.add_line(&p, 1, false).unwrap();
        cart.add_line(&p, 2, true).unwrap();
        assert_eq!(cart.remove_product(p.id), 2);
        assert!(cart.is_empty());
    }
}
