//! Shared scoring scales
//!
//! Zone cut points and banding tables used by the exercise strategies. The
//! per-exercise cut points differ on purpose and are kept literal.

use crate::types::Zone;

/// Lower score bounds for GREEN, BLUE and YELLOW; anything below is RED
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneScale {
    pub green: f64,
    pub blue: f64,
    pub yellow: f64,
}

impl ZoneScale {
    pub const fn new(green: f64, blue: f64, yellow: f64) -> Self {
        Self { green, blue, yellow }
    }

    pub fn zone(&self, score: f64) -> Zone {
        if score >= self.green {
            Zone::Green
        } else if score >= self.blue {
            Zone::Blue
        } else if score >= self.yellow {
            Zone::Yellow
        } else {
            Zone::Red
        }
    }
}

pub const ISOLATION_SCALE: ZoneScale = ZoneScale::new(0.85, 0.65, 0.40);
pub const SPREAD_SCALE: ZoneScale = ZoneScale::new(0.85, 0.65, 0.45);
pub const FLAT_SCALE: ZoneScale = ZoneScale::new(0.85, 0.65, 0.45);
pub const FIST_SCALE: ZoneScale = ZoneScale::new(0.80, 0.60, 0.45);

/// Minimum final score to pass isolation, pinch, spread and flat
pub const PASS_SCORE: f64 = 0.65;

/// Minimum final score to pass a fist
pub const FIST_PASS_SCORE: f64 = 0.55;

/// Normalized pinch distance bands: (upper bound, zone, score)
pub const PINCH_BANDS: [(f64, Zone, f64); 5] = [
    (0.05, Zone::Green, 1.0),
    (0.08, Zone::Green, 0.90),
    (0.12, Zone::Blue, 0.75),
    (0.18, Zone::Yellow, 0.55),
    (0.28, Zone::Yellow, 0.40),
];
pub const PINCH_FALLBACK: (Zone, f64) = (Zone::Red, 0.20);

/// Spread gap bands: (exclusive lower bound, score); wider is better
pub const SPREAD_GAP_BANDS: [(f64, f64); 4] = [(0.30, 1.0), (0.20, 0.80), (0.12, 0.60), (0.06, 0.40)];

/// Flat gap bands: (exclusive upper bound, score); tighter is better
pub const FLAT_GAP_BANDS: [(f64, f64); 4] = [(0.06, 1.0), (0.10, 0.80), (0.15, 0.60), (0.22, 0.40)];

/// Score given when no gap band matches
pub const GAP_FALLBACK: f64 = 0.20;

/// Zone and score for a normalized pinch distance
pub fn pinch_band(distance: f64) -> (Zone, f64) {
    PINCH_BANDS
        .iter()
        .find(|(bound, _, _)| distance < *bound)
        .map(|&(_, zone, score)| (zone, score))
        .unwrap_or(PINCH_FALLBACK)
}

/// Score the first band whose lower bound the value exceeds
pub fn band_above(value: f64, bands: &[(f64, f64)], fallback: f64) -> f64 {
    bands
        .iter()
        .find(|(bound, _)| value > *bound)
        .map(|&(_, score)| score)
        .unwrap_or(fallback)
}

/// Score the first band whose upper bound the value stays under
pub fn band_below(value: f64, bands: &[(f64, f64)], fallback: f64) -> f64 {
    bands
        .iter()
        .find(|(bound, _)| value < *bound)
        .map(|&(_, score)| score)
        .unwrap_or(fallback)
}

/// Arithmetic mean; an empty slice scores zero
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
