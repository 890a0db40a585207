//! Canonical sample hands
//!
//! Hand-built landmark sets for a right hand seen palm-on, fingers pointing up
//! the image (y grows downward). Used by the CLI `sample` command and by tests.

use crate::types::{Landmark, LANDMARK_COUNT};

/// Names accepted by [`by_name`]
pub const SAMPLE_NAMES: [&str; 6] = [
    "open-hand",
    "fist",
    "point-index",
    "point-index-middle-raised",
    "pinch",
    "flat-hand",
];

fn hand(points: [(f64, f64); LANDMARK_COUNT]) -> [Landmark; LANDMARK_COUNT] {
    points.map(|(x, y)| Landmark::xy(x, y))
}

/// All fingers extended and fanned apart
pub fn open_hand() -> [Landmark; LANDMARK_COUNT] {
    hand([
        (0.50, 0.85),
        // thumb
        (0.44, 0.78),
        (0.37, 0.72),
        (0.31, 0.67),
        (0.25, 0.63),
        // index
        (0.42, 0.60),
        (0.39, 0.52),
        (0.37, 0.47),
        (0.35, 0.42),
        // middle
        (0.48, 0.58),
        (0.48, 0.49),
        (0.48, 0.43),
        (0.48, 0.38),
        // ring
        (0.54, 0.60),
        (0.57, 0.52),
        (0.59, 0.47),
        (0.61, 0.42),
        // pinky
        (0.60, 0.63),
        (0.65, 0.57),
        (0.68, 0.53),
        (0.71, 0.49),
    ])
}

/// Every finger curled into the palm, thumb tucked in front of the index
pub fn closed_fist() -> [Landmark; LANDMARK_COUNT] {
    hand([
        (0.50, 0.85),
        // thumb
        (0.44, 0.78),
        (0.40, 0.72),
        (0.42, 0.67),
        (0.455, 0.65),
        // index
        (0.42, 0.60),
        (0.41, 0.55),
        (0.42, 0.62),
        (0.43, 0.67),
        // middle
        (0.48, 0.58),
        (0.48, 0.53),
        (0.48, 0.60),
        (0.485, 0.66),
        // ring
        (0.54, 0.60),
        (0.55, 0.55),
        (0.545, 0.62),
        (0.54, 0.67),
        // pinky
        (0.60, 0.63),
        (0.61, 0.59),
        (0.605, 0.645),
        (0.60, 0.69),
    ])
}

/// Index extended, everything else curled
pub fn point_index() -> [Landmark; LANDMARK_COUNT] {
    let mut landmarks = closed_fist();
    let open = open_hand();
    landmarks[5..9].copy_from_slice(&open[5..9]);
    landmarks
}

/// Pointing index with the middle finger lifted above the index PIP
pub fn point_index_middle_raised() -> [Landmark; LANDMARK_COUNT] {
    let mut landmarks = point_index();
    landmarks[10] = Landmark::xy(0.48, 0.50);
    landmarks[11] = Landmark::xy(0.48, 0.47);
    landmarks[12] = Landmark::xy(0.48, 0.45);
    landmarks
}

/// Thumb tip resting on the index tip, other fingers curled
pub fn pinch_thumb_index() -> [Landmark; LANDMARK_COUNT] {
    let mut landmarks = closed_fist();
    landmarks[1..5].copy_from_slice(&[
        Landmark::xy(0.44, 0.78),
        Landmark::xy(0.38, 0.72),
        Landmark::xy(0.36, 0.66),
        Landmark::xy(0.37, 0.61),
    ]);
    landmarks[5..9].copy_from_slice(&[
        Landmark::xy(0.42, 0.60),
        Landmark::xy(0.38, 0.54),
        Landmark::xy(0.36, 0.57),
        Landmark::xy(0.37, 0.61),
    ]);
    landmarks
}

/// All fingers extended with the tips pressed together
pub fn flat_hand() -> [Landmark; LANDMARK_COUNT] {
    hand([
        (0.50, 0.85),
        // thumb
        (0.45, 0.78),
        (0.42, 0.68),
        (0.43, 0.54),
        (0.44, 0.395),
        // index
        (0.43, 0.60),
        (0.44, 0.51),
        (0.45, 0.445),
        (0.46, 0.385),
        // middle
        (0.48, 0.59),
        (0.48, 0.50),
        (0.48, 0.44),
        (0.48, 0.38),
        // ring
        (0.53, 0.60),
        (0.52, 0.51),
        (0.51, 0.445),
        (0.50, 0.385),
        // pinky
        (0.58, 0.62),
        (0.56, 0.54),
        (0.54, 0.46),
        (0.52, 0.395),
    ])
}

/// Look up a sample by its CLI name
pub fn by_name(name: &str) -> Option<[Landmark; LANDMARK_COUNT]> {
    match name {
        "open-hand" => Some(open_hand()),
        "fist" => Some(closed_fist()),
        "point-index" => Some(point_index()),
        "point-index-middle-raised" => Some(point_index_middle_raised()),
        "pinch" => Some(pinch_thumb_index()),
        "flat-hand" => Some(flat_hand()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_resolves() {
        for name in SAMPLE_NAMES {
            let landmarks = by_name(name).unwrap();
            assert!(landmarks.iter().all(|lm| lm.is_finite()), "{name}");
        }
        assert!(by_name("jazz-hands").is_none());
    }

    #[test]
    fn test_pinch_tips_coincide() {
        let landmarks = pinch_thumb_index();
        assert_eq!(landmarks[4], landmarks[8]);
    }
}
