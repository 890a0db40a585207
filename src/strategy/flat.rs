//! Flat: all fingers extended and held together

use tracing::debug;

use super::{extension_survey, mean_tip_gap, ExerciseStrategy, PoseContext};
use crate::error::ComputeError;
use crate::exercise::{ExerciseDescriptor, ExerciseType};
use crate::scoring::{band_below, FLAT_GAP_BANDS, FLAT_SCALE, GAP_FALLBACK, PASS_SCORE};
use crate::types::{EvaluationResult, ExerciseMetrics};

const EXTENSION_WEIGHT: f64 = 0.6;
const TOGETHERNESS_WEIGHT: f64 = 0.4;

pub struct FlatStrategy;

impl ExerciseStrategy for FlatStrategy {
    fn exercise_type(&self) -> ExerciseType {
        ExerciseType::Flat
    }

    fn evaluate(
        &self,
        _exercise: &ExerciseDescriptor,
        ctx: &PoseContext,
    ) -> Result<EvaluationResult, ComputeError> {
        let (fingers, extension_score) = extension_survey(ctx);
        let mean_gap = mean_tip_gap(ctx);
        let togetherness = band_below(mean_gap, &FLAT_GAP_BANDS, GAP_FALLBACK);

        let score = (EXTENSION_WEIGHT * extension_score + TOGETHERNESS_WEIGHT * togetherness)
            .clamp(0.0, 1.0);

        debug!(extension_score, mean_gap, togetherness, score, "Flat evaluated");

        Ok(EvaluationResult {
            exercise: Some(ExerciseType::Flat),
            fingers,
            overall_zone: FLAT_SCALE.zone(score),
            overall_score: score,
            passed: score >= PASS_SCORE,
            violations: Vec::new(),
            metrics: ExerciseMetrics {
                mean_gap: Some(mean_gap),
                extension_score: Some(extension_score),
                togetherness_score: Some(togetherness),
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
    use crate::types::Zone;

    fn run(landmarks: &[crate::types::Landmark]) -> EvaluationResult {
        FlatStrategy
            .evaluate(&ExerciseDescriptor::flat(), &context(landmarks))
            .unwrap()
    }

    #[test]
    fn test_flat_hand_passes() {
        let result = run(&samples::flat_hand());
        assert_eq!(result.metrics.extension_score, Some(1.0));
        assert_eq!(result.metrics.togetherness_score, Some(0.60));
        assert!((result.overall_score - 0.84).abs() < 1e-12);
        assert_eq!(result.overall_zone, Zone::Blue);
        assert!(result.passed);
    }

    #[test]
    fn test_spread_fingers_score_lower_than_flat() {
        let flat = run(&samples::flat_hand());
        let open = run(&samples::open_hand());
        assert_eq!(open.metrics.togetherness_score, Some(0.20));
        assert!(open.overall_score < flat.overall_score);
    }
}
