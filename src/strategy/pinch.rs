//! Pinch: bring two fingertips together

use tracing::debug;

use super::{ExerciseStrategy, PoseContext};
use crate::boundary::Boundaries;
use crate::classifier::{evaluate_non_target, evaluate_thumb};
use crate::error::ComputeError;
use crate::exercise::{ExerciseDescriptor, ExerciseType};
use crate::scoring::{pinch_band, PASS_SCORE};
use crate::types::{EvaluationResult, ExerciseMetrics, Finger, FingerResult, Violation, Zone};

/// Score multiplier when an uninvolved finger intrudes
const INTRUSION_PENALTY: f64 = 0.7;

pub struct PinchStrategy;

impl ExerciseStrategy for PinchStrategy {
    fn exercise_type(&self) -> ExerciseType {
        ExerciseType::Pinch
    }

    fn boundaries(
        &self,
        exercise: &ExerciseDescriptor,
        ctx: &PoseContext,
    ) -> Result<Boundaries, ComputeError> {
        let (a, b) = exercise.pinch_fingers()?;
        Ok(ctx.boundaries(&[a, b]))
    }

    fn evaluate(
        &self,
        exercise: &ExerciseDescriptor,
        ctx: &PoseContext,
    ) -> Result<EvaluationResult, ComputeError> {
        let (a, b) = exercise.pinch_fingers()?;
        let boundaries = ctx.boundaries(&[a, b]);

        let distance = ctx.pose.tip(a).distance_2d(&ctx.pose.tip(b)) / ctx.frame.hand_length;
        let (band_zone, band_score) = pinch_band(distance);

        let fingers: Vec<FingerResult> = Finger::ALL
            .iter()
            .map(|&finger| {
                if finger == a || finger == b {
                    FingerResult {
                        is_target: true,
                        pass: band_zone != Zone::Red,
                        ..FingerResult::new(
                            finger,
                            band_zone,
                            band_score,
                            format!("pinch distance {distance:.3}"),
                        )
                    }
                } else if finger.is_thumb() {
                    evaluate_thumb(&ctx.pose, &ctx.frame, false)
                } else {
                    evaluate_non_target(finger, &ctx.pose, &boundaries, &ctx.frame)
                }
            })
            .collect();

        // Only intrusions by uninvolved long fingers count against a pinch
        let violations: Vec<Violation> = fingers
            .iter()
            .filter(|r| !r.is_target && !r.finger.is_thumb() && r.is_major_violation())
            .filter_map(Violation::from_result)
            .collect();

        let (zone, penalty) = if violations.is_empty() {
            (band_zone, 1.0)
        } else if band_zone == Zone::Green {
            (Zone::Blue, INTRUSION_PENALTY)
        } else {
            (band_zone, INTRUSION_PENALTY)
        };
        let score = (band_score * penalty).clamp(0.0, 1.0);
        let passed = score >= PASS_SCORE;

        debug!(
            pair = ?(a, b),
            distance,
            penalty,
            violations = violations.len(),
            score,
            "Pinch evaluated"
        );

        Ok(EvaluationResult {
            exercise: Some(ExerciseType::Pinch),
            fingers,
            overall_zone: zone,
            overall_score: score,
            passed,
            violations,
            metrics: ExerciseMetrics {
                pinch_distance: Some(distance),
                penalty: Some(penalty),
                ..Default::default()
            },
            degenerate: false,
            error: None,
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::context;
    use super::*;
    use crate::samples;
    use crate::types::{Landmark, MIDDLE_TIP};

    fn run(landmarks: &[Landmark], exercise: &ExerciseDescriptor) -> EvaluationResult {
        PinchStrategy.evaluate(exercise, &context(landmarks)).unwrap()
    }

    #[test]
    fn test_coincident_tips_are_green() {
        let result = run(
            &samples::pinch_thumb_index(),
            &ExerciseDescriptor::pinch(Finger::Thumb, Finger::Index),
        );
        assert_eq!(result.overall_zone, Zone::Green);
        assert_eq!(result.overall_score, 1.0);
        assert_eq!(result.metrics.pinch_distance, Some(0.0));
        assert!(result.passed);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_default_pair_is_thumb_index() {
        let exercise = ExerciseDescriptor::new(ExerciseType::Pinch);
        let result = run(&samples::pinch_thumb_index(), &exercise);
        assert!(result.finger(Finger::Thumb).unwrap().is_target);
        assert!(result.finger(Finger::Index).unwrap().is_target);
        assert!(!result.finger(Finger::Middle).unwrap().is_target);
        assert_eq!(result.overall_score, 1.0);
    }

    #[test]
    fn test_open_hand_is_too_far_apart() {
        let result = run(
            &samples::open_hand(),
            &ExerciseDescriptor::pinch(Finger::Thumb, Finger::Index),
        );
        assert_eq!(result.overall_zone, Zone::Red);
        assert_eq!(result.finger(Finger::Index).unwrap().score, 0.20);
        // Extended middle, ring and pinky tips all sit above the index PIP line
        let intruders: Vec<Finger> = result.violations.iter().map(|v| v.finger).collect();
        assert_eq!(intruders, vec![Finger::Middle, Finger::Ring, Finger::Pinky]);
        assert_eq!(result.metrics.penalty, Some(INTRUSION_PENALTY));
        assert!((result.overall_score - 0.20 * INTRUSION_PENALTY).abs() < 1e-12);
        assert!(!result.passed);
    }

    #[test]
    fn test_far_apart_without_intruders() {
        // Open-hand pinch with the uninvolved fingers folded below the index PIP
        let mut landmarks = samples::open_hand();
        for finger in [Finger::Middle, Finger::Ring, Finger::Pinky] {
            let mcp = landmarks[finger.mcp()];
            landmarks[finger.tip()] = Landmark::xy(mcp.x, mcp.y + 0.02);
        }
        let result = run(
            &landmarks,
            &ExerciseDescriptor::pinch(Finger::Thumb, Finger::Index),
        );
        assert!(result.violations.is_empty());
        assert_eq!(result.overall_zone, Zone::Red);
        assert_eq!(result.overall_score, 0.20);
        assert!(!result.passed);
    }

    #[test]
    fn test_intruding_finger_demotes_green() {
        let mut landmarks = samples::pinch_thumb_index();
        landmarks[MIDDLE_TIP] = Landmark::xy(0.48, 0.45);
        let result = run(
            &landmarks,
            &ExerciseDescriptor::pinch(Finger::Thumb, Finger::Index),
        );

        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].finger, Finger::Middle);
        assert_eq!(result.overall_zone, Zone::Blue);
        assert!((result.overall_score - 0.7).abs() < 1e-12);
        assert!(result.passed);
    }

    #[test]
    fn test_invalid_pair_rejected() {
        let exercise = ExerciseDescriptor {
            pinch_pair: Some(vec![4, 4]),
            ..ExerciseDescriptor::new(ExerciseType::Pinch)
        };
        let err = PinchStrategy
            .evaluate(&exercise, &context(&samples::pinch_thumb_index()))
            .unwrap_err();
        assert!(matches!(err, ComputeError::InvalidExercise(_)));
    }
}
