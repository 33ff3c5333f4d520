//! Season knowledge base.
//!
//! The 12-season system is a closed set: every [`SeasonId`] resolves to exactly
//! one static [`SeasonEntry`] through an exhaustive `match`, so adding a season
//! without its entry is a build error rather than a runtime lookup failure.

mod data;
mod wheel;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use wheel::{shares_axis, undertone_family, WHEEL_ORDER};

/// Identifier of one of the 12 seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeasonId {
    TrueWinter,
    DarkWinter,
    BrightWinter,
    TrueSummer,
    LightSummer,
    SoftSummer,
    TrueAutumn,
    DarkAutumn,
    SoftAutumn,
    TrueSpring,
    LightSpring,
    BrightSpring,
}

impl SeasonId {
    /// All season ids, in declaration order.
    pub const ALL: [SeasonId; 12] = [
        SeasonId::TrueWinter,
        SeasonId::DarkWinter,
        SeasonId::BrightWinter,
        SeasonId::TrueSummer,
        SeasonId::LightSummer,
        SeasonId::SoftSummer,
        SeasonId::TrueAutumn,
        SeasonId::DarkAutumn,
        SeasonId::SoftAutumn,
        SeasonId::TrueSpring,
        SeasonId::LightSpring,
        SeasonId::BrightSpring,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonId::TrueWinter => "TRUE_WINTER",
            SeasonId::DarkWinter => "DARK_WINTER",
            SeasonId::BrightWinter => "BRIGHT_WINTER",
            SeasonId::TrueSummer => "TRUE_SUMMER",
            SeasonId::LightSummer => "LIGHT_SUMMER",
            SeasonId::SoftSummer => "SOFT_SUMMER",
            SeasonId::TrueAutumn => "TRUE_AUTUMN",
            SeasonId::DarkAutumn => "DARK_AUTUMN",
            SeasonId::SoftAutumn => "SOFT_AUTUMN",
            SeasonId::TrueSpring => "TRUE_SPRING",
            SeasonId::LightSpring => "LIGHT_SPRING",
            SeasonId::BrightSpring => "BRIGHT_SPRING",
        }
    }

    /// The knowledge base entry for this season.
    pub fn entry(&self) -> &'static SeasonEntry {
        lookup(*self)
    }

    /// The two seasons adjacent to this one on the color wheel.
    pub fn neighbors(&self) -> (SeasonId, SeasonId) {
        wheel::neighbors(*self)
    }
}

impl fmt::Display for SeasonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeason(pub String);

impl fmt::Display for UnknownSeason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown season id '{}'", self.0)
    }
}

impl std::error::Error for UnknownSeason {}

impl FromStr for SeasonId {
    type Err = UnknownSeason;

    /// Accepts the wire name, case-insensitively, with `-` or `_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        SeasonId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| UnknownSeason(s.to_string()))
    }
}

/// Role of a swatch inside a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwatchCategory {
    Base,
    Accent,
    Neutral,
}

/// A named color of a season palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorSwatch {
    pub name: &'static str,
    /// `#RRGGBB`.
    pub hex: &'static str,
    pub category: SwatchCategory,
}

impl ColorSwatch {
    /// Parses the hex code into its RGB components.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let digits = self.hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Descriptive traits of a season, used by flow theory to relate neighbors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Characteristics {
    pub undertone: &'static str,
    pub contrast: &'static str,
    pub chroma: &'static str,
}

/// Static display metadata and palette for one season.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonEntry {
    pub id: SeasonId,
    pub display_name: &'static str,
    pub description: &'static str,
    pub characteristics: Characteristics,
    pub palette: &'static [ColorSwatch],
}

/// Resolves a season to its knowledge base entry. Total over [`SeasonId`].
pub fn lookup(id: SeasonId) -> &'static SeasonEntry {
    match id {
        SeasonId::TrueWinter => &data::TRUE_WINTER,
        SeasonId::DarkWinter => &data::DARK_WINTER,
        SeasonId::BrightWinter => &data::BRIGHT_WINTER,
        SeasonId::TrueSummer => &data::TRUE_SUMMER,
        SeasonId::LightSummer => &data::LIGHT_SUMMER,
        SeasonId::SoftSummer => &data::SOFT_SUMMER,
        SeasonId::TrueAutumn => &data::TRUE_AUTUMN,
        SeasonId::DarkAutumn => &data::DARK_AUTUMN,
        SeasonId::SoftAutumn => &data::SOFT_AUTUMN,
        SeasonId::TrueSpring => &data::TRUE_SPRING,
        SeasonId::LightSpring => &data::LIGHT_SPRING,
        SeasonId::BrightSpring => &data::BRIGHT_SPRING,
    }
}

/// All entries, in wheel order.
pub fn seasons() -> impl Iterator<Item = &'static SeasonEntry> {
    WHEEL_ORDER.iter().map(|id| lookup(*id))
}
