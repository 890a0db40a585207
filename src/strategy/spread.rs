//! Spread: all fingers extended and fanned apart

use tracing::debug;

use super::{extension_survey, mean_tip_gap, ExerciseStrategy, PoseContext};
use crate::error::ComputeError;
use crate::exercise::{ExerciseDescriptor, ExerciseType};
use crate::scoring::{band_above, GAP_FALLBACK, PASS_SCORE, SPREAD_GAP_BANDS, SPREAD_SCALE};
use crate::types::{EvaluationResult, ExerciseMetrics};

const EXTENSION_WEIGHT: f64 = 0.5;
const GAP_WEIGHT: f64 = 0.5;

pub struct SpreadStrategy;

impl ExerciseStrategy for SpreadStrategy {
    fn exercise_type(&self) -> ExerciseType {
        ExerciseType::Spread
    }

    fn evaluate(
        &self,
        _exercise: &ExerciseDescriptor,
        ctx: &PoseContext,
    ) -> Result<EvaluationResult, ComputeError> {
        let (fingers, extension_score) = extension_survey(ctx);
        let mean_gap = mean_tip_gap(ctx);
        let gap_score = band_above(mean_gap, &SPREAD_GAP_BANDS, GAP_FALLBACK);

        let score =
            (EXTENSION_WEIGHT * extension_score + GAP_WEIGHT * gap_score).clamp(0.0, 1.0);

        debug!(extension_score, mean_gap, gap_score, score, "Spread evaluated");

        Ok(EvaluationResult {
            exercise: Some(ExerciseType::Spread),
            fingers,
            overall_zone: SPREAD_SCALE.zone(score),
            overall_score: score,
            passed: score >= PASS_SCORE,
            violations: Vec::new(),
            metrics: ExerciseMetrics {
                mean_gap: Some(mean_gap),
                extension_score: Some(extension_score),
                gap_score: Some(gap_score),
                ..Default::default()
            },
            degenerate: false,
            error: None,
            message: None,
        })
    }
}
