//! Fist: every long finger folded into the palm

use tracing::debug;

use super::{ExerciseStrategy, PoseContext};
use crate::classifier::{evaluate_thumb, extension_ratio};
use crate::error::ComputeError;
use crate::exercise::{ExerciseDescriptor, ExerciseType};
use crate::scoring::{mean, FIST_PASS_SCORE, FIST_SCALE};
use crate::types::{EvaluationResult, ExerciseMetrics, Finger, FingerResult, Zone};

pub struct FistStrategy;

impl FistStrategy {
    /// Grade how far a long finger is folded.
    ///
    /// `curl` is the tip's drop below its knuckle in hand lengths; the reach
    /// ratio must fall under 1 as the tip comes back toward the wrist.
    fn grade(finger: Finger, ctx: &PoseContext) -> FingerResult {
        let curl = (ctx.pose.tip(finger).y - ctx.pose.mcp(finger).y) / ctx.frame.hand_length;
        let ratio = extension_ratio(&ctx.pose, finger);

        let (zone, score, label) = if curl > 0.08 && ratio < 0.9 {
            (Zone::Green, 1.0, "fully curled")
        } else if curl > 0.02 && ratio < 1.0 {
            (Zone::Blue, 0.75, "mostly curled")
        } else if curl > -0.05 && ratio < 1.1 {
            (Zone::Yellow, 0.45, "partially curled")
        } else {
            (Zone::Red, 0.20, "not curled")
        };
        let curled = zone != Zone::Red;

        FingerResult {
            is_target: true,
            curled,
            extended: !curled,
            pass: curled,
            ..FingerResult::new(
                finger,
                zone,
                score,
                format!("{label} (curl {curl:.3}, ratio {ratio:.3})"),
            )
        }
    }
}

impl ExerciseStrategy for FistStrategy {
    fn exercise_type(&self) -> ExerciseType {
        ExerciseType::Fist
    }

    fn evaluate(
        &self,
        _exercise: &ExerciseDescriptor,
        ctx: &PoseContext,
    ) -> Result<EvaluationResult, ComputeError> {
        let mut fingers = Vec::with_capacity(Finger::ALL.len());
        // thumb is reported but not scored
        fingers.push(evaluate_thumb(&ctx.pose, &ctx.frame, false));
        fingers.extend(Finger::LONG.iter().map(|&finger| Self::grade(finger, ctx)));

        let scores: Vec<f64> = fingers
            .iter()
            .filter(|r| !r.finger.is_thumb())
            .map(|r| r.score)
            .collect();
        let score = mean(&scores).clamp(0.0, 1.0);

        debug!(score, "Fist evaluated");

        Ok(EvaluationResult {
            exercise: Some(ExerciseType::Fist),
            fingers,
            overall_zone: FIST_SCALE.zone(score),
            overall_score: score,
            passed: score >= FIST_PASS_SCORE,
            violations: Vec::new(),
            metrics: ExerciseMetrics::default(),
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
    use crate::types::{Landmark, INDEX_TIP};

    fn run(landmarks: &[Landmark]) -> EvaluationResult {
        FistStrategy
            .evaluate(&ExerciseDescriptor::fist(), &context(landmarks))
            .unwrap()
    }

    #[test]
    fn test_closed_fist_is_green() {
        let result = run(&samples::closed_fist());
        assert!(result.overall_score >= 0.80);
        assert_eq!(result.overall_zone, Zone::Green);
        assert!(result.passed);
        for finger in Finger::LONG {
            assert!(result.finger(finger).unwrap().curled, "{finger:?}");
        }
    }

    #[test]
    fn test_open_hand_is_not_a_fist() {
        let result = run(&samples::open_hand());
        assert_eq!(result.overall_zone, Zone::Red);
        assert!((result.overall_score - 0.20).abs() < 1e-12);
        assert!(!result.passed);
    }

    #[test]
    fn test_thumb_is_not_scored() {
        let mut landmarks = samples::closed_fist();
        landmarks[4] = Landmark::xy(0.20, 0.30);
        let result = run(&landmarks);
        assert_eq!(result.overall_score, run(&samples::closed_fist()).overall_score);
        assert!(!result.finger(Finger::Thumb).unwrap().is_target);
    }

    #[test]
    fn test_single_open_finger_drags_the_mean() {
        let mut landmarks = samples::closed_fist();
        landmarks[6] = Landmark::xy(0.39, 0.52);
        landmarks[7] = Landmark::xy(0.37, 0.47);
        landmarks[INDEX_TIP] = Landmark::xy(0.35, 0.42);
        let result = run(&landmarks);

        assert_eq!(result.finger(Finger::Index).unwrap().zone, Zone::Red);
        assert!((result.overall_score - 0.80).abs() < 1e-12);
        assert!(result.passed);
    }
}
