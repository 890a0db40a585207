//! Pipeline orchestration
//!
//! This module provides the public API for Handform. Each call runs the full
//! per-frame pipeline: landmark validation → hand frame → descriptor
//! validation → exercise strategy → evaluation result.
//!
//! Nothing is carried between calls; concurrent callers never share state.

use tracing::debug;

use crate::boundary::Boundaries;
use crate::config::EvaluatorConfig;
use crate::error::ComputeError;
use crate::exercise::ExerciseDescriptor;
use crate::normalizer::FrameNormalizer;
use crate::strategy::{strategy_for, PoseContext};
use crate::types::{EvaluationResult, Landmark};

/// Evaluate one frame against an exercise with the default configuration.
///
/// Never fails: bad landmarks or descriptors produce a failing result that
/// carries an error tag and message.
///
/// # Example
/// ```ignore
/// let result = evaluate(&landmarks, &ExerciseDescriptor::isolation(&[Finger::Index]));
/// if result.passed { /* ... */ }
/// ```
pub fn evaluate(landmarks: &[Landmark], exercise: &ExerciseDescriptor) -> EvaluationResult {
    Evaluator::new().evaluate(landmarks, exercise)
}

/// Boundaries the exercise's strategy would test non-target fingers against
pub fn boundaries_for(
    landmarks: &[Landmark],
    exercise: &ExerciseDescriptor,
) -> Result<Boundaries, ComputeError> {
    Evaluator::new().boundaries_for(landmarks, exercise)
}

/// JSON-in, JSON-out form of [`evaluate`].
///
/// # Arguments
/// * `landmarks_json` - JSON array of `{x, y, z?}` objects
/// * `exercise_json` - Exercise descriptor JSON
///
/// # Returns
/// Serialized `EvaluationResult`; parse failures become failing results
pub fn evaluate_json(landmarks_json: &str, exercise_json: &str) -> String {
    Evaluator::new().evaluate_json(landmarks_json, exercise_json)
}

/// Context-free evaluator holding an immutable configuration.
///
/// Cheap to create and safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Create an evaluator with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with a validated custom configuration
    pub fn with_config(config: EvaluatorConfig) -> Result<Self, ComputeError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate one frame, folding any error into a failing result
    pub fn evaluate(&self, landmarks: &[Landmark], exercise: &ExerciseDescriptor) -> EvaluationResult {
        match self.try_evaluate(landmarks, exercise) {
            Ok(result) => result,
            Err(e) => {
                debug!(
                    exercise = exercise.exercise_type.as_str(),
                    error = e.tag().as_str(),
                    "Evaluation rejected: {e}"
                );
                EvaluationResult::failure(Some(exercise.exercise_type.clone()), &e)
            }
        }
    }

    /// Evaluate one frame, returning errors instead of failing results.
    ///
    /// Landmarks are validated before the descriptor. A frame whose extents had
    /// to be clamped is still graded but flagged `degenerate` and never passes.
    pub fn try_evaluate(
        &self,
        landmarks: &[Landmark],
        exercise: &ExerciseDescriptor,
    ) -> Result<EvaluationResult, ComputeError> {
        let ctx = self.context(landmarks)?;
        exercise.validate()?;
        let strategy = strategy_for(&exercise.exercise_type)?;
        let mut result = strategy.evaluate(exercise, &ctx)?;
        if ctx.frame.degenerate {
            debug!(
                exercise = exercise.exercise_type.as_str(),
                "Degenerate hand frame, withholding pass"
            );
            result.degenerate = true;
            result.passed = false;
        }
        debug!(
            exercise = exercise.exercise_type.as_str(),
            zone = result.overall_zone.as_str(),
            score = result.overall_score,
            passed = result.passed,
            "Frame evaluated"
        );
        Ok(result)
    }

    /// Debug accessor for the boundary triple the strategy uses internally
    pub fn boundaries_for(
        &self,
        landmarks: &[Landmark],
        exercise: &ExerciseDescriptor,
    ) -> Result<Boundaries, ComputeError> {
        let ctx = self.context(landmarks)?;
        exercise.validate()?;
        let strategy = strategy_for(&exercise.exercise_type)?;
        strategy.boundaries(exercise, &ctx)
    }

    /// JSON-in, JSON-out evaluation.
    ///
    /// A malformed descriptor is only reported once the landmarks are known
    /// to be valid.
    pub fn evaluate_json(&self, landmarks_json: &str, exercise_json: &str) -> String {
        let landmarks: Vec<Landmark> = match serde_json::from_str(landmarks_json) {
            Ok(landmarks) => landmarks,
            Err(e) => {
                let err = ComputeError::InvalidInput(format!("landmarks: {e}"));
                return encode_result(&EvaluationResult::failure(None, &err));
            }
        };
        let exercise: ExerciseDescriptor = match serde_json::from_str(exercise_json) {
            Ok(exercise) => exercise,
            Err(e) => {
                let err = self
                    .context(&landmarks)
                    .err()
                    .unwrap_or_else(|| ComputeError::InvalidExercise(e.to_string()));
                return encode_result(&EvaluationResult::failure(None, &err));
            }
        };
        encode_result(&self.evaluate(&landmarks, &exercise))
    }

    fn context(&self, landmarks: &[Landmark]) -> Result<PoseContext, ComputeError> {
        let (pose, frame) = FrameNormalizer::normalize(landmarks, &self.config)?;
        Ok(PoseContext::new(pose, frame, self.config.boundary_extent))
    }
}

/// Serialize a result; only a non-serializable value can fail, which is reported inline
pub(crate) fn encode_result(result: &EvaluationResult) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| {
        serde_json::json!({
            "overall_zone": "RED",
            "overall_score": 0.0,
            "passed": false,
            "fingers": [],
            "violations": [],
            "error": "invalid_input",
            "message": e.to_string(),
        })
        .to_string()
    })
}
