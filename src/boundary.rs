//! Boundary construction
//!
//! Builds the three exercise-relative decision lines non-target fingertips are
//! tested against. Lines are anchored on the target fingers' joints so they
//! follow the hand's position and tilt:
//! - GREEN through the PIP joints
//! - ACCEPTABLE through the DIP joints
//! - LOW through the MCP joints

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_BOUNDARY_EXTENT;
use crate::normalizer::{HandFrame, HandPose};
use crate::types::{Finger, Landmark, Point2D};

/// Lines whose horizontal span is below this are treated as vertical
const VERTICAL_EPSILON: f64 = 1e-6;

/// Finger used as the reference when no long finger is targeted
const FALLBACK_REFERENCE: Finger = Finger::Middle;

/// Tier of a boundary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoundaryLevel {
    Green,
    Acceptable,
    Low,
}

/// Screen-space decision line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryLine {
    pub start: Point2D,
    pub end: Point2D,
    pub level: BoundaryLevel,
}

impl BoundaryLine {
    /// Horizontal line through `anchor`, reaching `half_width` to either side
    pub fn horizontal(anchor: Landmark, half_width: f64, level: BoundaryLevel) -> Self {
        Self {
            start: Point2D::new(anchor.x - half_width, anchor.y),
            end: Point2D::new(anchor.x + half_width, anchor.y),
            level,
        }
    }

    /// Segment between two joints
    pub fn between(a: Landmark, b: Landmark, level: BoundaryLevel) -> Self {
        Self {
            start: a.point(),
            end: b.point(),
            level,
        }
    }

    /// Line height at `x`, extrapolating past the endpoints
    pub fn y_at(&self, x: f64) -> f64 {
        let dx = self.end.x - self.start.x;
        if dx.abs() < VERTICAL_EPSILON {
            return (self.start.y + self.end.y) / 2.0;
        }
        let t = (x - self.start.x) / dx;
        self.start.y + t * (self.end.y - self.start.y)
    }

    /// Whether `point` lies above the line (smaller y in image coordinates)
    pub fn is_above(&self, point: Point2D) -> bool {
        point.y < self.y_at(point.x)
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }
}

/// The three boundary lines for one frame and exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundaries {
    pub green: BoundaryLine,
    pub acceptable: BoundaryLine,
    pub low: BoundaryLine,
    /// Long fingers whose joints anchor the lines
    pub reference: Vec<Finger>,
}

/// Builder for exercise-relative boundaries
pub struct BoundaryConstructor {
    extent: f64,
}

impl Default for BoundaryConstructor {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDARY_EXTENT)
    }
}

impl BoundaryConstructor {
    /// `extent` is the half-length of single-target lines, in hand widths
    pub fn new(extent: f64) -> Self {
        Self { extent }
    }

    /// Build boundaries from the exercise's target fingers.
    ///
    /// The thumb never anchors a boundary. With no long-finger target the
    /// middle finger is used; with several, the outermost two are joined.
    pub fn build(&self, targets: &[Finger], pose: &HandPose, frame: &HandFrame) -> Boundaries {
        let anchors: Vec<Finger> = targets.iter().copied().filter(|f| !f.is_thumb()).collect();

        let lowest = anchors.iter().min().copied();
        let highest = anchors.iter().max().copied();

        match (lowest, highest) {
            (Some(first), Some(last)) if first != last => Boundaries {
                green: BoundaryLine::between(pose.pip(first), pose.pip(last), BoundaryLevel::Green),
                acceptable: BoundaryLine::between(
                    pose.dip(first),
                    pose.dip(last),
                    BoundaryLevel::Acceptable,
                ),
                low: BoundaryLine::between(pose.mcp(first), pose.mcp(last), BoundaryLevel::Low),
                reference: vec![first, last],
            },
            (Some(only), _) => self.single(only, pose, frame),
            _ => self.single(FALLBACK_REFERENCE, pose, frame),
        }
    }

    fn single(&self, finger: Finger, pose: &HandPose, frame: &HandFrame) -> Boundaries {
        let half_width = self.extent * frame.hand_width;
        Boundaries {
            green: BoundaryLine::horizontal(pose.pip(finger), half_width, BoundaryLevel::Green),
            acceptable: BoundaryLine::horizontal(
                pose.dip(finger),
                half_width,
                BoundaryLevel::Acceptable,
            ),
            low: BoundaryLine::horizontal(pose.mcp(finger), half_width, BoundaryLevel::Low),
            reference: vec![finger],
        }
    }
}

/// Build boundaries with the default line extent
pub fn build_boundaries(targets: &[Finger], pose: &HandPose, frame: &HandFrame) -> Boundaries {
    BoundaryConstructor::default().build(targets, pose, frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MIN_EXTENT;
    use crate::samples;
    use crate::types::{INDEX_DIP, INDEX_MCP, INDEX_PIP, MIDDLE_PIP, RING_DIP, RING_PIP};

    fn setup(landmarks: &[Landmark]) -> (HandPose, HandFrame) {
        let pose = HandPose::try_from(landmarks).unwrap();
        let frame = HandFrame::from_pose(&pose, DEFAULT_MIN_EXTENT);
        (pose, frame)
    }

    #[test]
    fn test_single_target_lines_are_horizontal() {
        let landmarks = samples::open_hand();
        let (pose, frame) = setup(&landmarks);
        let b = build_boundaries(&[Finger::Index], &pose, &frame);

        assert!(b.green.is_horizontal());
        assert!(b.acceptable.is_horizontal());
        assert!(b.low.is_horizontal());
        assert_eq!(b.green.start.y, landmarks[INDEX_PIP].y);
        assert_eq!(b.acceptable.start.y, landmarks[INDEX_DIP].y);
        assert_eq!(b.low.start.y, landmarks[INDEX_MCP].y);
        assert_eq!(b.reference, vec![Finger::Index]);

        let span = b.green.end.x - b.green.start.x;
        assert!((span - 3.0 * frame.hand_width).abs() < 1e-9);
    }

    #[test]
    fn test_thumb_only_falls_back_to_middle() {
        let landmarks = samples::open_hand();
        let (pose, frame) = setup(&landmarks);

        let empty = build_boundaries(&[], &pose, &frame);
        let thumb = build_boundaries(&[Finger::Thumb], &pose, &frame);
        assert_eq!(empty, thumb);
        assert_eq!(thumb.reference, vec![Finger::Middle]);
        assert_eq!(thumb.green.start.y, landmarks[MIDDLE_PIP].y);
    }

    #[test]
    fn test_multiple_targets_join_outermost_fingers() {
        let landmarks = samples::open_hand();
        let (pose, frame) = setup(&landmarks);
        let b = build_boundaries(&[Finger::Ring, Finger::Thumb, Finger::Index, Finger::Middle], &pose, &frame);

        assert_eq!(b.reference, vec![Finger::Index, Finger::Ring]);
        assert_eq!(b.green.start, landmarks[INDEX_PIP].point());
        assert_eq!(b.green.end, landmarks[RING_PIP].point());
        assert_eq!(b.acceptable.end, landmarks[RING_DIP].point());
        assert_eq!(b.green.level, BoundaryLevel::Green);
        assert_eq!(b.low.level, BoundaryLevel::Low);
    }

    #[test]
    fn test_above_uses_interpolation() {
        let line = BoundaryLine::between(
            Landmark::xy(0.2, 0.5),
            Landmark::xy(0.6, 0.3),
            BoundaryLevel::Green,
        );
        assert!((line.y_at(0.4) - 0.4).abs() < 1e-12);
        assert!(line.is_above(Point2D::new(0.4, 0.39)));
        assert!(!line.is_above(Point2D::new(0.4, 0.41)));
        // extrapolated past the segment end
        assert!((line.y_at(0.8) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_vertical_line_uses_average_height() {
        let line = BoundaryLine::between(
            Landmark::xy(0.5, 0.4),
            Landmark::xy(0.5, 0.6),
            BoundaryLevel::Acceptable,
        );
        assert_eq!(line.y_at(0.9), 0.5);
        assert!(line.is_above(Point2D::new(0.1, 0.45)));
    }

    #[test]
    fn test_custom_extent() {
        let landmarks = samples::open_hand();
        let (pose, frame) = setup(&landmarks);
        let b = BoundaryConstructor::new(0.5).build(&[Finger::Pinky], &pose, &frame);
        let span = b.low.end.x - b.low.start.x;
        assert!((span - frame.hand_width).abs() < 1e-9);
    }
}
