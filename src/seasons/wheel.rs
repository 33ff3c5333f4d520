//! The 12-season color wheel.
//!
//! Flow theory places each season between two neighbors that share at least
//! one axis with it: undertone family, contrast, or chroma.

use super::{lookup, Characteristics, SeasonId};

/// Seasons in wheel order. The wheel is cyclic: the last entry neighbors the first.
pub const WHEEL_ORDER: [SeasonId; 12] = [
    SeasonId::BrightSpring,
    SeasonId::TrueSpring,
    SeasonId::LightSpring,
    SeasonId::LightSummer,
    SeasonId::TrueSummer,
    SeasonId::SoftSummer,
    SeasonId::SoftAutumn,
    SeasonId::TrueAutumn,
    SeasonId::DarkAutumn,
    SeasonId::DarkWinter,
    SeasonId::TrueWinter,
    SeasonId::BrightWinter,
];

fn position(id: SeasonId) -> usize {
    // WHEEL_ORDER is a permutation of SeasonId::ALL (checked in tests).
    WHEEL_ORDER.iter().position(|s| *s == id).unwrap_or(0)
}

pub(super) fn neighbors(id: SeasonId) -> (SeasonId, SeasonId) {
    let len = WHEEL_ORDER.len();
    let pos = position(id);
    (WHEEL_ORDER[(pos + len - 1) % len], WHEEL_ORDER[(pos + 1) % len])
}

/// Dominant temperature of an undertone label: "Warm-Neutral" belongs to "Warm".
pub fn undertone_family(undertone: &str) -> &str {
    undertone.split('-').next().unwrap_or(undertone).trim()
}

/// Whether two seasons share at least one flow axis.
pub fn shares_axis(a: SeasonId, b: SeasonId) -> bool {
    let Characteristics {
        undertone: ua,
        contrast: ca,
        chroma: ka,
    } = &lookup(a).characteristics;
    let Characteristics {
        undertone: ub,
        contrast: cb,
        chroma: kb,
    } = &lookup(b).characteristics;

    undertone_family(ua) == undertone_family(ub) || ca == cb || ka == kb
}
