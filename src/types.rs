//! Core types for the Handform evaluator
//!
//! This module defines the data structures that flow through each stage of an
//! evaluation: raw landmarks, finger identities, zones, and per-finger and
//! aggregate results.

use serde::{Deserialize, Serialize};

use crate::error::{ComputeError, ErrorTag};
use crate::exercise::ExerciseType;

// ============================================================================
// LANDMARK INDICES
// ============================================================================

/// Number of landmarks in a tracked hand
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Fingertip landmark indices, in finger order
pub const TIP_NODES: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

// ============================================================================
// GEOMETRY
// ============================================================================

/// One tracked point of the hand.
///
/// `x`/`y` are normalized to the camera frame (y grows downward), `z` is a
/// relative depth that may be zero when the tracker does not provide it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar landmark (z = 0)
    pub const fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Screen-space distance, ignoring depth
    pub fn distance_2d(&self, other: &Landmark) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Euclidean distance including relative depth
    pub fn distance_3d(&self, other: &Landmark) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Screen-space point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ============================================================================
// FINGERS
// ============================================================================

/// Finger identity, ordered as in the landmark layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Fingers that carry MCP/PIP/DIP joints (everything but the thumb)
    pub const LONG: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn index(self) -> usize {
        match self {
            Finger::Thumb => 0,
            Finger::Index => 1,
            Finger::Middle => 2,
            Finger::Ring => 3,
            Finger::Pinky => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Finger> {
        Finger::ALL.get(index).copied()
    }

    /// Finger owning a fingertip landmark (4, 8, 12, 16 or 20)
    pub fn from_tip_node(node: usize) -> Option<Finger> {
        TIP_NODES
            .iter()
            .position(|&tip| tip == node)
            .and_then(Finger::from_index)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Finger::Thumb => "thumb",
            Finger::Index => "index",
            Finger::Middle => "middle",
            Finger::Ring => "ring",
            Finger::Pinky => "pinky",
        }
    }

    /// Landmark indices base→tip.
    ///
    /// For the thumb these are CMC, MCP, IP, TIP; for the other fingers MCP,
    /// PIP, DIP, TIP.
    pub fn joints(self) -> [usize; 4] {
        let base = 1 + self.index() * 4;
        [base, base + 1, base + 2, base + 3]
    }

    /// Knuckle used as the finger's base for extension ratios.
    ///
    /// The thumb's MCP sits one joint above its CMC base.
    pub fn mcp(self) -> usize {
        match self {
            Finger::Thumb => THUMB_MCP,
            _ => self.joints()[0],
        }
    }

    pub fn pip(self) -> usize {
        self.joints()[1]
    }

    pub fn dip(self) -> usize {
        self.joints()[2]
    }

    pub fn tip(self) -> usize {
        self.joints()[3]
    }

    pub fn is_thumb(self) -> bool {
        matches!(self, Finger::Thumb)
    }
}

// ============================================================================
// ZONES AND RESULTS
// ============================================================================

/// Discrete accuracy tier, best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    Green,
    Blue,
    Yellow,
    Red,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Green => "GREEN",
            Zone::Blue => "BLUE",
            Zone::Yellow => "YELLOW",
            Zone::Red => "RED",
        }
    }

    /// Rank where a higher value is a better zone
    pub fn rank(&self) -> u8 {
        match self {
            Zone::Green => 3,
            Zone::Blue => 2,
            Zone::Yellow => 1,
            Zone::Red => 0,
        }
    }
}

/// Severity of a non-target intrusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
}

/// Classification of a single finger for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerResult {
    pub finger: Finger,
    /// Finger index (0 = thumb … 4 = pinky)
    pub finger_index: usize,
    pub zone: Zone,
    /// Score in 0-1
    pub score: f64,
    /// Whether the exercise asked for this finger to be active
    pub is_target: bool,
    pub extended: bool,
    pub curled: bool,
    pub pass: bool,
    /// Whether the finger intruded on target territory
    pub violation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub detail: String,
}

impl FingerResult {
    /// Result with neutral flags; classifiers fill in the rest
    pub fn new(finger: Finger, zone: Zone, score: f64, detail: impl Into<String>) -> Self {
        Self {
            finger,
            finger_index: finger.index(),
            zone,
            score: score.clamp(0.0, 1.0),
            is_target: false,
            extended: false,
            curled: false,
            pass: true,
            violation: false,
            severity: None,
            detail: detail.into(),
        }
    }

    pub fn is_major_violation(&self) -> bool {
        self.violation && self.severity == Some(Severity::Major)
    }
}

/// A non-target finger that crossed into the target's working zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub finger: Finger,
    pub finger_index: usize,
    pub severity: Severity,
}

impl Violation {
    /// Extract the violation carried by a finger result, if any
    pub fn from_result(result: &FingerResult) -> Option<Violation> {
        if !result.violation {
            return None;
        }
        Some(Violation {
            finger: result.finger,
            finger_index: result.finger_index,
            severity: result.severity.unwrap_or(Severity::Minor),
        })
    }
}

/// Strategy-specific intermediate values exposed for debugging overlays
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseMetrics {
    /// Mean of the target-finger scores before penalties (isolation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_mean: Option<f64>,
    /// Multiplier applied for violations (isolation, pinch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty: Option<f64>,
    /// Tip-to-tip distance divided by hand length (pinch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinch_distance: Option<f64>,
    /// Mean adjacent-tip gap divided by hand width (spread, flat)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_gap: Option<f64>,
    /// Mean per-finger extension score (spread, flat)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_score: Option<f64>,
    /// Banded gap score (spread)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_score: Option<f64>,
    /// Banded inverted gap score (flat)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub togetherness_score: Option<f64>,
}

/// Aggregate verdict for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Exercise family that produced the result (absent for unparseable input)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise: Option<ExerciseType>,
    pub fingers: Vec<FingerResult>,
    pub overall_zone: Zone,
    /// Score in 0-1
    pub overall_score: f64,
    pub passed: bool,
    pub violations: Vec<Violation>,
    #[serde(default)]
    pub metrics: ExerciseMetrics,
    /// Hand extents collapsed below the minimum and were clamped; never passes
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degenerate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EvaluationResult {
    /// Well-formed failing result for a bad frame or descriptor
    pub fn failure(exercise: Option<ExerciseType>, error: &ComputeError) -> Self {
        Self {
            exercise,
            fingers: Vec::new(),
            overall_zone: Zone::Red,
            overall_score: 0.0,
            passed: false,
            violations: Vec::new(),
            metrics: ExerciseMetrics::default(),
            degenerate: false,
            error: Some(error.tag()),
            message: Some(error.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn finger(&self, finger: Finger) -> Option<&FingerResult> {
        self.fingers.iter().find(|r| r.finger == finger)
    }

    pub fn has_major_violation(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Major)
    }
}
