//! Isolation: extend the target fingers while the others stay relaxed

use tracing::debug;

use super::{ExerciseStrategy, PoseContext};
use crate::boundary::Boundaries;
use crate::classifier::classify_finger;
use crate::error::ComputeError;
use crate::exercise::{ExerciseDescriptor, ExerciseType};
use crate::scoring::{mean, ISOLATION_SCALE, PASS_SCORE};
use crate::types::{EvaluationResult, ExerciseMetrics, Finger, FingerResult, Severity, Violation};

/// Score multiplier when any non-target finger commits a major violation
const MAJOR_PENALTY: f64 = 0.5;

/// Score multiplier when only minor violations occurred
const MINOR_PENALTY: f64 = 0.85;

pub struct IsolationStrategy;

impl IsolationStrategy {
    fn targets(exercise: &ExerciseDescriptor) -> Result<Vec<Finger>, ComputeError> {
        let targets = exercise.targets()?;
        if targets.is_empty() {
            return Err(ComputeError::InvalidExercise(
                "isolation requires at least one target finger".to_string(),
            ));
        }
        Ok(targets)
    }
}

impl ExerciseStrategy for IsolationStrategy {
    fn exercise_type(&self) -> ExerciseType {
        ExerciseType::Isolation
    }

    fn boundaries(
        &self,
        exercise: &ExerciseDescriptor,
        ctx: &PoseContext,
    ) -> Result<Boundaries, ComputeError> {
        Ok(ctx.boundaries(&Self::targets(exercise)?))
    }

    fn evaluate(
        &self,
        exercise: &ExerciseDescriptor,
        ctx: &PoseContext,
    ) -> Result<EvaluationResult, ComputeError> {
        let targets = Self::targets(exercise)?;
        let boundaries = ctx.boundaries(&targets);

        let fingers: Vec<FingerResult> = Finger::ALL
            .iter()
            .map(|&finger| {
                classify_finger(
                    finger,
                    targets.contains(&finger),
                    &ctx.pose,
                    &boundaries,
                    &ctx.frame,
                )
            })
            .collect();

        let target_scores: Vec<f64> = fingers
            .iter()
            .filter(|r| r.is_target)
            .map(|r| r.score)
            .collect();
        let target_mean = mean(&target_scores);

        let violations: Vec<Violation> = fingers.iter().filter_map(Violation::from_result).collect();
        for result in fingers.iter().filter(|r| r.violation) {
            debug!(
                finger = result.finger.as_str(),
                zone = result.zone.as_str(),
                "Non-target intrusion: {}",
                result.detail
            );
        }
        let has_major = violations.iter().any(|v| v.severity == Severity::Major);

        let penalty = if has_major {
            MAJOR_PENALTY
        } else if !violations.is_empty() {
            MINOR_PENALTY
        } else {
            1.0
        };
        let score = (target_mean * penalty).clamp(0.0, 1.0);

        let targets_ok = fingers.iter().filter(|r| r.is_target).all(|r| r.pass);
        let passed = targets_ok && !has_major && score >= PASS_SCORE;

        debug!(
            targets = ?targets,
            target_mean,
            penalty,
            violations = violations.len(),
            score,
            "Isolation evaluated"
        );

        Ok(EvaluationResult {
            exercise: Some(ExerciseType::Isolation),
            fingers,
            overall_zone: ISOLATION_SCALE.zone(score),
            overall_score: score,
            passed,
            violations,
            metrics: ExerciseMetrics {
                target_mean: Some(target_mean),
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
    use crate::types::{Landmark, Zone, THUMB_TIP};

    fn run(landmarks: &[Landmark], targets: &[Finger]) -> EvaluationResult {
        IsolationStrategy
            .evaluate(&ExerciseDescriptor::isolation(targets), &context(landmarks))
            .unwrap()
    }

    #[test]
    fn test_clean_index_isolation() {
        let result = run(&samples::point_index(), &[Finger::Index]);
        assert_eq!(result.overall_zone, Zone::Green);
        assert_eq!(result.overall_score, 1.0);
        assert!(result.passed);
        assert!(result.violations.is_empty());
        assert_eq!(result.fingers.len(), 5);
        assert!(result.finger(Finger::Index).unwrap().is_target);
    }

    #[test]
    fn test_major_violation_halves_score() {
        let result = run(&samples::point_index_middle_raised(), &[Finger::Index]);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].finger, Finger::Middle);
        assert_eq!(result.violations[0].severity, Severity::Major);
        assert!((result.overall_score - 0.5).abs() < 1e-12);
        assert_eq!(result.metrics.penalty, Some(MAJOR_PENALTY));
        assert!(!result.passed);
    }

    #[test]
    fn test_thumb_interference_applies_minor_penalty() {
        let mut landmarks = samples::point_index();
        landmarks[THUMB_TIP] = Landmark::xy(0.52, 0.70);
        let result = run(&landmarks, &[Finger::Index]);

        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].severity, Severity::Minor);
        assert!((result.overall_score - 0.85).abs() < 1e-12);
        assert!(result.passed);
    }

    #[test]
    fn test_curled_target_fails() {
        let result = run(&samples::closed_fist(), &[Finger::Index]);
        assert_eq!(result.overall_zone, Zone::Red);
        assert!(!result.passed);
    }

    #[test]
    fn test_empty_targets_rejected() {
        let exercise = ExerciseDescriptor::isolation(&[]);
        let err = IsolationStrategy
            .evaluate(&exercise, &context(&samples::open_hand()))
            .unwrap_err();
        assert!(matches!(err, ComputeError::InvalidExercise(_)));
    }

    #[test]
    fn test_is_idempotent() {
        let landmarks = samples::point_index_middle_raised();
        let first = run(&landmarks, &[Finger::Index, Finger::Thumb]);
        let second = run(&landmarks, &[Finger::Index, Finger::Thumb]);
        assert_eq!(first, second);
    }
}
