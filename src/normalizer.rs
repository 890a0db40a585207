//! Hand frame normalization
//!
//! This module validates a raw landmark snapshot and derives the per-frame
//! reference metrics every classifier divides by:
//! - Hand length (wrist to middle fingertip, 3D)
//! - Hand width (index knuckle to pinky knuckle, 2D)
//! - Palm center (mean of the wrist and the four long-finger knuckles)

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{EvaluatorConfig, DEFAULT_MIN_EXTENT};
use crate::error::ComputeError;
use crate::types::{
    Finger, Landmark, Point2D, INDEX_MCP, LANDMARK_COUNT, MIDDLE_MCP, MIDDLE_TIP, PINKY_MCP,
    RING_MCP, WRIST,
};

/// Validated 21-point hand snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandPose {
    /// Validate a landmark slice.
    ///
    /// Short slices are always rejected. Longer slices are rejected when
    /// `strict` is set, otherwise only the first 21 points are used.
    pub fn new(landmarks: &[Landmark], strict: bool) -> Result<Self, ComputeError> {
        if landmarks.len() < LANDMARK_COUNT || (strict && landmarks.len() > LANDMARK_COUNT) {
            return Err(ComputeError::InvalidInput(format!(
                "expected {LANDMARK_COUNT} landmarks, got {}",
                landmarks.len()
            )));
        }

        if let Some(index) = landmarks[..LANDMARK_COUNT]
            .iter()
            .position(|lm| !lm.is_finite())
        {
            return Err(ComputeError::InvalidInput(format!(
                "landmark {index} has a non-finite coordinate"
            )));
        }

        let mut points = [Landmark::default(); LANDMARK_COUNT];
        points.copy_from_slice(&landmarks[..LANDMARK_COUNT]);
        Ok(Self { landmarks: points })
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Landmark by index; indices come from the fixed layout constants
    pub fn get(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn wrist(&self) -> Landmark {
        self.landmarks[WRIST]
    }

    pub fn mcp(&self, finger: Finger) -> Landmark {
        self.landmarks[finger.mcp()]
    }

    pub fn pip(&self, finger: Finger) -> Landmark {
        self.landmarks[finger.pip()]
    }

    pub fn dip(&self, finger: Finger) -> Landmark {
        self.landmarks[finger.dip()]
    }

    pub fn tip(&self, finger: Finger) -> Landmark {
        self.landmarks[finger.tip()]
    }
}

impl TryFrom<&[Landmark]> for HandPose {
    type Error = ComputeError;

    fn try_from(landmarks: &[Landmark]) -> Result<Self, Self::Error> {
        HandPose::new(landmarks, true)
    }
}

/// Scale- and orientation-invariant reference metrics for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    pub wrist: Landmark,
    /// Wrist to middle fingertip
    pub hand_length: f64,
    /// Index knuckle to pinky knuckle
    pub hand_width: f64,
    pub palm_center: Point2D,
    /// True when either extent had to be clamped
    pub degenerate: bool,
}

impl HandFrame {
    /// Derive the frame from a validated pose, clamping both extents to `min_extent`
    pub fn from_pose(pose: &HandPose, min_extent: f64) -> Self {
        let wrist = pose.wrist();
        let raw_length = wrist.distance_3d(&pose.get(MIDDLE_TIP));
        let raw_width = pose.get(INDEX_MCP).distance_2d(&pose.get(PINKY_MCP));

        let degenerate = raw_length < min_extent || raw_width < min_extent;
        if degenerate {
            warn!(
                hand_length = raw_length,
                hand_width = raw_width,
                "Degenerate hand frame, clamping extents to {min_extent}"
            );
        }

        let palm_nodes = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
        let (sum_x, sum_y) = palm_nodes.iter().fold((0.0, 0.0), |(sx, sy), &i| {
            let lm = pose.get(i);
            (sx + lm.x, sy + lm.y)
        });
        let n = palm_nodes.len() as f64;

        Self {
            wrist,
            hand_length: raw_length.max(min_extent),
            hand_width: raw_width.max(min_extent),
            palm_center: Point2D::new(sum_x / n, sum_y / n),
            degenerate,
        }
    }
}

/// Normalizer turning raw landmarks into a pose plus its reference frame
pub struct FrameNormalizer;

impl FrameNormalizer {
    /// Validate landmarks and compute the hand frame
    pub fn normalize(
        landmarks: &[Landmark],
        config: &EvaluatorConfig,
    ) -> Result<(HandPose, HandFrame), ComputeError> {
        let pose = HandPose::new(landmarks, config.strict_landmark_count)?;
        let frame = HandFrame::from_pose(&pose, config.min_extent);
        Ok((pose, frame))
    }
}

/// Compute the hand frame for a raw landmark slice
pub fn compute_frame(landmarks: &[Landmark]) -> Result<HandFrame, ComputeError> {
    let pose = HandPose::try_from(landmarks)?;
    Ok(HandFrame::from_pose(&pose, DEFAULT_MIN_EXTENT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;

    #[test]
    fn test_rejects_short_input() {
        let landmarks = vec![Landmark::xy(0.5, 0.5); 20];
        let err = compute_frame(&landmarks).unwrap_err();
        assert!(matches!(err, ComputeError::InvalidInput(_)));
        assert!(err.to_string().contains("got 20"));
    }

    #[test]
    fn test_extra_landmarks_respect_strictness() {
        let mut landmarks = samples::open_hand().to_vec();
        landmarks.push(Landmark::xy(0.1, 0.1));

        assert!(HandPose::new(&landmarks, true).is_err());
        let pose = HandPose::new(&landmarks, false).unwrap();
        assert_eq!(pose.landmarks()[..], samples::open_hand()[..]);
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut landmarks = samples::open_hand().to_vec();
        landmarks[7].y = f64::NAN;
        let err = compute_frame(&landmarks).unwrap_err();
        assert!(err.to_string().contains("landmark 7"));
    }

    #[test]
    fn test_open_hand_frame() {
        let frame = compute_frame(&samples::open_hand()).unwrap();
        // wrist (0.50, 0.85) to middle tip (0.48, 0.38)
        let expected_length = (0.02f64 * 0.02 + 0.47 * 0.47).sqrt();
        assert!((frame.hand_length - expected_length).abs() < 1e-9);
        // index MCP (0.42, 0.60) to pinky MCP (0.60, 0.63)
        let expected_width = (0.18f64 * 0.18 + 0.03 * 0.03).sqrt();
        assert!((frame.hand_width - expected_width).abs() < 1e-9);
        assert!((frame.palm_center.x - 0.508).abs() < 1e-9);
        assert!((frame.palm_center.y - 0.652).abs() < 1e-9);
        assert!(!frame.degenerate);
    }

    #[test]
    fn test_hand_length_uses_depth() {
        let mut landmarks = samples::open_hand();
        landmarks[MIDDLE_TIP].z = 0.3;
        let flat = compute_frame(&samples::open_hand()).unwrap();
        let deep = compute_frame(&landmarks).unwrap();
        assert!(deep.hand_length > flat.hand_length);
        assert_eq!(deep.hand_width, flat.hand_width);
    }

    #[test]
    fn test_degenerate_frame_is_clamped() {
        let landmarks = [Landmark::xy(0.5, 0.5); LANDMARK_COUNT];
        let frame = compute_frame(&landmarks).unwrap();
        assert!(frame.degenerate);
        assert_eq!(frame.hand_length, DEFAULT_MIN_EXTENT);
        assert_eq!(frame.hand_width, DEFAULT_MIN_EXTENT);
    }
}
