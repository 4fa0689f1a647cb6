use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed color palette for products. Keys are stored in the database as
/// plain lowercase strings; hex and display name are always derived, never
/// stored alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    BurgundiMaron,
    BurgundiUngu,
    EmeralBlue,
    EmeralGreen,
    Mahogani,
    Dusty,
    RoseGold,
    Mocca,
    Milo,
    Denim,
    Hitam,
    Putih,
    Terakota,
    Sage,
    Taro,
    Lilak,
}

pub const ALL_COLORS: [Color; 16] = [
    Color::BurgundiMaron,
    Color::BurgundiUngu,
    Color::EmeralBlue,
    Color::EmeralGreen,
    Color::Mahogani,
    Color::Dusty,
    Color::RoseGold,
    Color::Mocca,
    Color::Milo,
    Color::Denim,
    Color::Hitam,
    Color::Putih,
    Color::Terakota,
    Color::Sage,
    Color::Taro,
    Color::Lilak,
];

impl Color {
    pub fn key(&self) -> &'static str {
        match self {
            Color::BurgundiMaron => "burgundimaron",
            Color::BurgundiUngu => "burgundiungu",
            Color::EmeralBlue => "emeralblue",
            Color::EmeralGreen => "emeralgreen",
            Color::Mahogani => "mahogani",
            Color::Dusty => "dusty",
            Color::RoseGold => "rosegold",
            Color::Mocca => "mocca",
            Color::Milo => "milo",
            Color::Denim => "denim",
            Color::Hitam => "hitam",
            Color::Putih => "putih",
            Color::Terakota => "terakota",
            Color::Sage => "sage",
            Color::Taro => "taro",
            Color::Lilak => "lilak",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            Color::BurgundiMaron => "#800020",
            Color::BurgundiUngu => "#660033",
            Color::EmeralBlue => "#0F5A5E",
            Color::EmeralGreen => "#50C878",
            Color::Mahogani => "#3D0C02",
            Color::Dusty => "#B2996E",
            Color::RoseGold => "#DEA193",
            Color::Mocca => "#9D7651",
            Color::Milo => "#F2E4D4",
            Color::Denim => "#5A86AD",
            Color::Hitam => "#000000",
            Color::Putih => "#FFFFFF",
            Color::Terakota => "#C86F47",
            Color::Sage => "#A3B899",
            Color::Taro => "#B56F76",
            Color::Lilak => "#DCA1A1",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Color::BurgundiMaron => "Burgundi Maron",
            Color::BurgundiUngu => "Burgundi Ungu",
            Color::EmeralBlue => "Emeral Blue",
            Color::EmeralGreen => "Emeral Green",
            Color::Mahogani => "Mahogani",
            Color::Dusty => "Dusty",
            Color::RoseGold => "Rose Gold",
            Color::Mocca => "Mocha",
            Color::Milo => "Milo",
            Color::Denim => "Denim",
            Color::Hitam => "Black",
            Color::Putih => "White",
            Color::Terakota => "Terrakota",
            Color::Sage => "Sage",
            Color::Taro => "Taro",
            Color::Lilak => "Lilak",
        }
    }

    /// Zero-based position in the palette, used for product code suffixes.
    pub fn palette_index(&self) -> usize {
        ALL_COLORS.iter().position(|c| c == self).unwrap_or(0)
    }

    /// Parse a palette key, tolerating case and whitespace ("Rose Gold" and
    /// "rosegold" both resolve).
    pub fn from_key(key: &str) -> Option<Color> {
        let normalized: String = key
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        ALL_COLORS.iter().copied().find(|c| c.key() == normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_through_parse() {
        for color in ALL_COLORS {
            assert_eq!(Color::from_key(color.key()), Some(color));
        }
    }

    #[test]
    fn parse_normalizes_case_and_spaces() {
        assert_eq!(Color::from_key("Rose Gold"), Some(Color::RoseGold));
        assert_eq!(Color::from_key("HITAM"), Some(Color::Hitam));
        assert_eq!(Color::from_key("neon"), None);
    }

    #[test]
    fn palette_index_is_stable() {
        assert_eq!(Color::BurgundiMaron.palette_index(), 0);
        assert_eq!(Color::Lilak.palette_index(), 15);
    }

    #[test]
    fn display_and_hex_are_derived() {
        assert_eq!(Color::Hitam.display_name(), "Black");
        assert_eq!(Color::EmeralBlue.hex(), "#0F5A5E");
    }
}
