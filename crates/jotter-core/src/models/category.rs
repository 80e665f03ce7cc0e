//! Category model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Server-assigned category identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

impl CategoryId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CategoryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A `#RRGGBB` color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Color given to categories created without one
pub const DEFAULT_CATEGORY_COLOR: HexColor = HexColor::new(0xFF, 0xFF, 0xFF);

impl HexColor {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Subtract `amount` from every channel, stopping at black.
    ///
    /// List cards use 30 for their border, the editor frame uses 25.
    #[must_use]
    pub const fn darken(self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_sub(amount),
            g: self.g.saturating_sub(amount),
            b: self.b.saturating_sub(amount),
        }
    }
}

impl Default for HexColor {
    fn default() -> Self {
        DEFAULT_CATEGORY_COLOR
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}', expected #RRGGBB")]
pub struct ParseColorError(String);

impl FromStr for HexColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded = match hex.len() {
            6 => hex.to_string(),
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(invalid()),
        };
        let channel = |index: usize| {
            u8::from_str_radix(&expanded[index..index + 2], 16).map_err(|_| invalid())
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A color-coded category owned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub color: HexColor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_hex() {
        let color: HexColor = "#F4E1B2".parse().unwrap();
        assert_eq!(color, HexColor::new(0xF4, 0xE1, 0xB2));
        assert_eq!(color.to_string(), "#f4e1b2");
    }

    #[test]
    fn parse_shorthand_hex_doubles_digits() {
        let color: HexColor = "#abc".parse().unwrap();
        assert_eq!(color, HexColor::new(0xAA, 0xBB, 0xCC));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("F4E1B2".parse::<HexColor>().is_err());
        assert!("#F4E1B".parse::<HexColor>().is_err());
        assert!("#GGGGGG".parse::<HexColor>().is_err());
    }

    #[test]
    fn darken_saturates_at_zero() {
        let color = HexColor::new(0x10, 0x80, 0xFF).darken(30);
        assert_eq!(color, HexColor::new(0x00, 0x62, 0xE1));
    }

    #[test]
    fn category_without_color_is_white() {
        let category: Category = serde_json::from_str(r#"{"id": 1, "name": "Personal"}"#).unwrap();
        assert_eq!(category.color, DEFAULT_CATEGORY_COLOR);
        assert_eq!(category.id, CategoryId::new(1));
    }
}
