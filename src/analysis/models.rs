//! Typed result of a seasonal color analysis.

use crate::seasons::SeasonId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Skin undertone temperature (Munsell hue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkinHue {
    Warm,
    Cool,
    Neutral,
}

impl SkinHue {
    pub const ALL: [SkinHue; 3] = [SkinHue::Warm, SkinHue::Cool, SkinHue::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkinHue::Warm => "Warm",
            SkinHue::Cool => "Cool",
            SkinHue::Neutral => "Neutral",
        }
    }
}

/// Skin lightness (Munsell value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkinValue {
    Light,
    Medium,
    Deep,
}

impl SkinValue {
    pub const ALL: [SkinValue; 3] = [SkinValue::Light, SkinValue::Medium, SkinValue::Deep];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkinValue::Light => "Light",
            SkinValue::Medium => "Medium",
            SkinValue::Deep => "Deep",
        }
    }
}

/// Skin saturation (Munsell chroma).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkinChroma {
    Clear,
    Muted,
}

impl SkinChroma {
    pub const ALL: [SkinChroma; 2] = [SkinChroma::Clear, SkinChroma::Muted];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkinChroma::Clear => "Clear",
            SkinChroma::Muted => "Muted",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(SkinHue, SkinValue, SkinChroma);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinAnalysis {
    pub hue: SkinHue,
    pub value: SkinValue,
    pub chroma: SkinChroma,
}

/// Hair level and dye formulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HairDiagnosis {
    /// Natural depth, 1 (black) to 10 (lightest blonde).
    pub natural_level: u8,
    /// Underlying pigment, e.g. "Orange".
    pub undertone: String,
    pub recommended_formula: String,
    /// Dye shade notation such as "6.34". Kept as text so the reflect digits
    /// survive exactly as written.
    pub technical_code: String,
    pub developer_vol: String,
    pub explanation: String,
}

/// Lifts beyond this many levels need a stronger developer.
pub const MAX_SAFE_LIFT: i16 = 3;

impl HairDiagnosis {
    pub fn technical_code(&self) -> Option<TechnicalCode> {
        TechnicalCode::parse(&self.technical_code)
    }

    /// Levels between the natural level and the target depth of the formula.
    /// Negative when the formula deposits darker than the natural level.
    pub fn lift_levels(&self) -> Option<i16> {
        let target = self.technical_code()?.level;
        Some(i16::from(target) - i16::from(self.natural_level))
    }

    pub fn exceeds_safe_lift(&self) -> bool {
        self.lift_levels()
            .map(|lift| lift > MAX_SAFE_LIFT)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub season_id: SeasonId,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub reasoning: String,
    pub skin_analysis: SkinAnalysis,
    pub hair_diagnosis: HairDiagnosis,
}

impl AnalysisResult {
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Tonal reflect encoded by the digits after the dot of a technical code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reflect {
    Natural,
    Ash,
    Iridescent,
    Golden,
    Copper,
    Mahogany,
    Red,
    Matte,
    Pearl,
    Unknown(u8),
}

impl Reflect {
    pub fn from_digit(digit: u8) -> Self {
        match digit {
            0 => Reflect::Natural,
            1 => Reflect::Ash,
            2 => Reflect::Iridescent,
            3 => Reflect::Golden,
            4 => Reflect::Copper,
            5 => Reflect::Mahogany,
            6 => Reflect::Red,
            7 => Reflect::Matte,
            8 => Reflect::Pearl,
            other => Reflect::Unknown(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Reflect::Natural => "Natural",
            Reflect::Ash => "Ash",
            Reflect::Iridescent => "Iridescent",
            Reflect::Golden => "Golden",
            Reflect::Copper => "Copper",
            Reflect::Mahogany => "Mahogany",
            Reflect::Red => "Red",
            Reflect::Matte => "Matte",
            Reflect::Pearl => "Pearl",
            Reflect::Unknown(_) => "Unknown",
        }
    }
}

/// Parsed form of a dye shade such as "6.34": depth 6, golden primary reflect,
/// copper secondary reflect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnicalCode {
    pub level: u8,
    pub reflects: Vec<Reflect>,
}

impl TechnicalCode {
    pub fn parse(code: &str) -> Option<Self> {
        let (depth, tones) = match code.trim().split_once('.') {
            Some((depth, tones)) => (depth, tones),
            None => (code.trim(), ""),
        };
        if depth.is_empty() || !depth.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        // Dye depths follow the 1 (black) to 10 (lightest blonde) scale.
        let level = depth.parse::<u8>().ok().filter(|level| (1..=10).contains(level))?;
        let reflects = tones
            .chars()
            .map(|c| c.to_digit(10).map(|d| Reflect::from_digit(d as u8)))
            .collect::<Option<Vec<_>>>()?;
        Some(TechnicalCode { level, reflects })
    }

    /// Human readable reflect description, e.g. "Golden Copper".
    pub fn reflect_names(&self) -> String {
        self.reflects
            .iter()
            .map(|r| r.name())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_hair(natural_level: u8, technical_code: &str) -> HairDiagnosis {
        HairDiagnosis {
            natural_level,
            undertone: "Orange".to_string(),
            recommended_formula: "Golden Copper".to_string(),
            technical_code: technical_code.to_string(),
            developer_vol: "20 Vol".to_string(),
            explanation: "Warm reflects harmonize with the skin.".to_string(),
        }
    }

    #[test]
    fn test_technical_code_parse() {
        let code = TechnicalCode::parse("6.34").unwrap();
        assert_eq!(code.level, 6);
        assert_eq!(code.reflects, vec![Reflect::Golden, Reflect::Copper]);
        assert_eq!(code.reflect_names(), "Golden Copper");

        let plain = TechnicalCode::parse("7").unwrap();
        assert_eq!(plain.level, 7);
        assert!(plain.reflects.is_empty());

        assert!(TechnicalCode::parse("").is_none());
        assert!(TechnicalCode::parse("6.x").is_none());
        assert!(TechnicalCode::parse("-6.1").is_none());
    }

    #[test]
    fn test_technical_code_depth_outside_scale() {
        assert!(TechnicalCode::parse("0.1").is_none());
        assert!(TechnicalCode::parse("11").is_none());
        assert!(TechnicalCode::parse("128.1").is_none());
        assert!(TechnicalCode::parse("200").is_none());
        assert!(TechnicalCode::parse("99999").is_none());
        assert_eq!(TechnicalCode::parse("10.1").unwrap().level, 10);

        assert_eq!(make_hair(1, "128.1").lift_levels(), None);
        assert!(!make_hair(5, "200").exceeds_safe_lift());
    }

    #[test]
    fn test_lift_levels_never_overflow() {
        assert_eq!(make_hair(255, "10").lift_levels(), Some(-245));
        assert_eq!(make_hair(128, "1").lift_levels(), Some(-127));
        assert_eq!(make_hair(0, "10").lift_levels(), Some(10));
    }

    #[test]
    fn test_lift_levels() {
        assert_eq!(make_hair(6, "6.34").lift_levels(), Some(0));
        assert_eq!(make_hair(5, "9.1").lift_levels(), Some(4));
        assert_eq!(make_hair(8, "6.0").lift_levels(), Some(-2));
        assert_eq!(make_hair(5, "not a code").lift_levels(), None);
    }

    #[test]
    fn test_exceeds_safe_lift() {
        assert!(!make_hair(6, "9.1").exceeds_safe_lift());
        assert!(make_hair(5, "9.1").exceeds_safe_lift());
        assert!(!make_hair(9, "4.5").exceeds_safe_lift());
    }

    #[test]
    fn test_confidence_percent() {
        let result = AnalysisResult {
            season_id: SeasonId::DarkAutumn,
            confidence: 0.874,
            reasoning: String::new(),
            skin_analysis: SkinAnalysis {
                hue: SkinHue::Warm,
                value: SkinValue::Deep,
                chroma: SkinChroma::Muted,
            },
            hair_diagnosis: make_hair(6, "6.34"),
        };
        assert_eq!(result.confidence_percent(), 87);
    }

    #[test]
    fn test_enum_serde_names() {
        for hue in SkinHue::ALL {
            assert_eq!(
                serde_json::to_value(hue).unwrap(),
                serde_json::json!(hue.as_str())
            );
        }
        for value in SkinValue::ALL {
            assert_eq!(
                serde_json::to_value(value).unwrap(),
                serde_json::json!(value.as_str())
            );
        }
        for chroma in SkinChroma::ALL {
            assert_eq!(
                serde_json::to_value(chroma).unwrap(),
                serde_json::json!(chroma.as_str())
            );
        }
    }
}
