//! Finger classifiers
//!
//! Three independent per-finger policies:
//! - Target fingers are graded on extension quality
//! - Non-target fingers are only checked for intrusion past the boundaries
//! - The thumb has its own extension test and is ignored unless it clearly
//!   interferes

use crate::boundary::Boundaries;
use crate::normalizer::{HandFrame, HandPose};
use crate::types::{Finger, FingerResult, Severity, Zone, INDEX_MCP, PINKY_MCP, THUMB_TIP};

/// Non-target thumb must reach this far past the index knuckle, in hand widths
const THUMB_LATERAL_REACH: f64 = 0.3;

/// ... and be at least this far from the wrist, in hand lengths
const THUMB_WRIST_REACH: f64 = 0.6;

/// Distance from wrist to tip divided by distance from wrist to knuckle.
///
/// Above 1 the tip is farther out than its own base, i.e. the finger is
/// straight rather than folded back.
pub fn extension_ratio(pose: &HandPose, finger: Finger) -> f64 {
    let wrist = pose.wrist();
    let tip_reach = pose.tip(finger).distance_3d(&wrist);
    let base_reach = pose.mcp(finger).distance_3d(&wrist);
    tip_reach / base_reach.max(f64::EPSILON)
}

/// Vertical lift of the tip over its knuckle, in hand lengths (positive = up)
pub fn normalized_extension(pose: &HandPose, finger: Finger, frame: &HandFrame) -> f64 {
    (pose.mcp(finger).y - pose.tip(finger).y) / frame.hand_length
}

/// Grade a finger the exercise wants extended.
///
/// Both signals must clear a tier's thresholds; a finger that clears only one
/// falls through to a lower tier.
pub fn evaluate_target_finger(finger: Finger, pose: &HandPose, frame: &HandFrame) -> FingerResult {
    match finger {
        Finger::Thumb => evaluate_thumb(pose, frame, true),
        Finger::Index | Finger::Middle | Finger::Ring | Finger::Pinky => {
            let extension = normalized_extension(pose, finger, frame);
            let ratio = extension_ratio(pose, finger);
            let metrics = format!("extension {extension:.3}, ratio {ratio:.3}");

            let (zone, score, extended, label) = if extension > 0.15 && ratio > 1.3 {
                (Zone::Green, (0.85 + extension).min(1.0), true, "fully extended")
            } else if extension > 0.08 && ratio > 1.15 {
                (Zone::Blue, 0.75, true, "mostly extended")
            } else if extension > 0.02 && ratio > 1.0 {
                (Zone::Yellow, 0.55, true, "partially extended")
            } else if extension > -0.05 {
                (Zone::Yellow, 0.40, false, "barely lifted")
            } else {
                (Zone::Red, 0.20, false, "not extended")
            };

            FingerResult {
                is_target: true,
                extended,
                curled: !extended,
                pass: zone != Zone::Red,
                ..FingerResult::new(finger, zone, score, format!("{label} ({metrics})"))
            }
        }
    }
}

/// Check a finger the exercise wants relaxed.
///
/// Only the fingertip's position against the GREEN and ACCEPTABLE lines
/// matters; curl is never measured.
pub fn evaluate_non_target(
    finger: Finger,
    pose: &HandPose,
    boundaries: &Boundaries,
    frame: &HandFrame,
) -> FingerResult {
    match finger {
        Finger::Thumb => evaluate_thumb(pose, frame, false),
        Finger::Index | Finger::Middle | Finger::Ring | Finger::Pinky => {
            let tip = pose.tip(finger).point();

            if boundaries.green.is_above(tip) {
                FingerResult {
                    pass: false,
                    violation: true,
                    severity: Some(Severity::Major),
                    ..FingerResult::new(
                        finger,
                        Zone::Red,
                        0.3,
                        "tip above the green boundary (intruding on target zone)",
                    )
                }
            } else if boundaries.acceptable.is_above(tip) {
                FingerResult::new(finger, Zone::Yellow, 0.7, "tip above the acceptable boundary")
            } else {
                FingerResult::new(finger, Zone::Green, 1.0, "safe zone")
            }
        }
    }
}

/// Grade the thumb.
///
/// As a target it must reach away from both the wrist and the palm. Otherwise
/// it is ignored unless it crosses well over the index knuckle while reaching
/// out, which only ever earns a minor flag.
pub fn evaluate_thumb(pose: &HandPose, frame: &HandFrame, is_target: bool) -> FingerResult {
    let tip = pose.get(THUMB_TIP);

    if is_target {
        let ratio = extension_ratio(pose, Finger::Thumb);
        let away = tip.point().distance(&frame.palm_center) / frame.hand_width;
        let metrics = format!("ratio {ratio:.3}, away {away:.3}");

        let (zone, score, label) = if ratio > 1.4 && away > 0.4 {
            (Zone::Green, 1.0, "fully extended")
        } else if ratio > 1.2 && away > 0.3 {
            (Zone::Blue, 0.75, "mostly extended")
        } else if ratio > 1.0 {
            (Zone::Yellow, 0.50, "partially extended")
        } else {
            (Zone::Red, 0.25, "not extended")
        };
        let extended = zone != Zone::Red;

        return FingerResult {
            is_target: true,
            extended,
            curled: !extended,
            pass: extended,
            ..FingerResult::new(Finger::Thumb, zone, score, format!("{label} ({metrics})"))
        };
    }

    let index_base = pose.get(INDEX_MCP);
    let toward_pinky = if pose.get(PINKY_MCP).x >= index_base.x { 1.0 } else { -1.0 };
    let lateral = (tip.x - index_base.x) * toward_pinky;
    let reach = tip.distance_3d(&frame.wrist);

    if lateral > THUMB_LATERAL_REACH * frame.hand_width
        && reach > THUMB_WRIST_REACH * frame.hand_length
    {
        FingerResult {
            violation: true,
            severity: Some(Severity::Minor),
            ..FingerResult::new(
                Finger::Thumb,
                Zone::Yellow,
                0.8,
                "crossing over the index knuckle",
            )
        }
    } else {
        FingerResult::new(Finger::Thumb, Zone::Green, 1.0, "ignored")
    }
}

/// Route a finger to whichever classifier applies for this exercise
pub fn classify_finger(
    finger: Finger,
    is_target: bool,
    pose: &HandPose,
    boundaries: &Boundaries,
    frame: &HandFrame,
) -> FingerResult {
    if is_target {
        evaluate_target_finger(finger, pose, frame)
    } else {
        evaluate_non_target(finger, pose, boundaries, frame)
    }
}
