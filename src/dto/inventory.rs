use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::{ALL_CHANNELS, Channel};

/// Move units from the warehouse pool into per-channel allocations. Omitted
/// channels keep their current allocation.
#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
pub struct DistributeStockRequest {
    pub tiktok: Option<i32>,
    pub shopee: Option<i32>,
    pub toko: Option<i32>,
}

impl DistributeStockRequest {
    /// Requested amount per channel, in channel order; omitted channels
    /// become 0.
    pub fn allocations(&self) -> [(Channel, i32); 3] {
        ALL_CHANNELS.map(|channel| (channel, self.amount_for(channel)))
    }

    fn amount_for(&self, channel: Channel) -> i32 {
        match channel {
            Channel::Tiktok => self.tiktok,
            Channel::Shopee => self.shopee,
            Channel::Toko => self.toko,
        }
        .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddStockRequest {
    pub amount: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_cover_every_channel_in_order() {
        let request = DistributeStockRequest {
            tiktok: Some(3),
            shopee: None,
            toko: Some(7),
        };
        assert_eq!(
            request.allocations(),
            [
                (Channel::Tiktok, 3),
                (Channel::Shopee, 0),
                (Channel::Toko, 7),
            ]
        );
    }
}
