use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::colors::Color;

/// Sales channels a product's stock can be allocated to. The set is closed;
/// every place that used to compare free-form role strings goes through this
/// enum instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Tiktok,
    Shopee,
    Toko,
}

pub const ALL_CHANNELS: [Channel; 3] = [Channel::Tiktok, Channel::Shopee, Channel::Toko];

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Tiktok => "tiktok",
            Channel::Shopee => "shopee",
            Channel::Toko => "toko",
        }
    }

    /// Short prefix used when deriving product codes.
    pub fn code_prefix(&self) -> &'static str {
        match self {
            Channel::Tiktok => "TT",
            Channel::Shopee => "SH",
            Channel::Toko => "TK",
        }
    }

    pub fn from_str(value: &str) -> Option<Channel> {
        match value {
            "tiktok" => Some(Channel::Tiktok),
            "shopee" => Some(Channel::Shopee),
            "toko" => Some(Channel::Toko),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller roles. Sellers operate one channel; the manager owns warehouse
/// distribution and the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Seller(Channel),
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Seller(channel) => channel.as_str(),
            Role::Manager => "manager",
        }
    }

    pub fn from_str(value: &str) -> Option<Role> {
        if value == "manager" {
            return Some(Role::Manager);
        }
        Channel::from_str(value).map(Role::Seller)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub product_code: String,
    pub name: String,
    pub price: i64,
    pub total_stock: i32,
    pub tiktok_stock: i32,
    pub shopee_stock: i32,
    pub toko_stock: i32,
    pub color: Color,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn channel_stock(&self, channel: Channel) -> i32 {
        match channel {
            Channel::Tiktok => self.tiktok_stock,
            Channel::Shopee => self.shopee_stock,
            Channel::Toko => self.toko_stock,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogEntry {
    pub id: Uuid,
    pub action: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_covers_channels_and_manager() {
        assert_eq!(Role::from_str("tiktok"), Some(Role::Seller(Channel::Tiktok)));
        assert_eq!(Role::from_str("manager"), Some(Role::Manager));
        assert_eq!(Role::from_str("admin"), None);
    }

    #[test]
    fn channel_stock_selects_the_right_pool() {
        let product = Product {
            id: Uuid::new_v4(),
            product_code: "TT-1-00".into(),
            name: "Test".into(),
            price: 1000,
            total_stock: 50,
            tiktok_stock: 5,
            shopee_stock: 7,
            toko_stock: 9,
            color: Color::Hitam,
            created_at: Utc::now(),
        };
        assert_eq!(product.channel_stock(Channel::Tiktok), 5);
        assert_eq!(product.channel_stock(Channel::Shopee), 7);
        assert_eq!(product.channel_stock(Channel::Toko), 9);
    }
}
