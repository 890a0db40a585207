//! Exercise strategies
//!
//! Each pose family composes the finger classifiers into an aggregate verdict.
//! Strategies are stateless unit types; the dispatcher looks one up per call.

mod fist;
mod flat;
mod isolation;
mod pinch;
mod spread;

pub use fist::FistStrategy;
pub use flat::FlatStrategy;
pub use isolation::IsolationStrategy;
pub use pinch::PinchStrategy;
pub use spread::SpreadStrategy;

use crate::boundary::{Boundaries, BoundaryConstructor};
use crate::classifier::evaluate_target_finger;
use crate::error::ComputeError;
use crate::exercise::{ExerciseDescriptor, ExerciseType};
use crate::normalizer::{HandFrame, HandPose};
use crate::scoring::mean;
use crate::types::{EvaluationResult, Finger, FingerResult, TIP_NODES};

/// Everything a strategy needs about the current frame
#[derive(Debug, Clone, Copy)]
pub struct PoseContext {
    pub pose: HandPose,
    pub frame: HandFrame,
    /// Half-length of single-target boundary lines, in hand widths
    pub boundary_extent: f64,
}

impl PoseContext {
    pub fn new(pose: HandPose, frame: HandFrame, boundary_extent: f64) -> Self {
        Self {
            pose,
            frame,
            boundary_extent,
        }
    }

    /// Boundaries anchored on the given target fingers
    pub fn boundaries(&self, targets: &[Finger]) -> Boundaries {
        BoundaryConstructor::new(self.boundary_extent).build(targets, &self.pose, &self.frame)
    }
}

/// Trait for pose-family evaluators
pub trait ExerciseStrategy {
    /// Exercise family handled by this strategy
    fn exercise_type(&self) -> ExerciseType;

    /// Boundaries this strategy tests non-target fingers against.
    ///
    /// Families without target fingers report the fallback reference lines.
    fn boundaries(
        &self,
        _exercise: &ExerciseDescriptor,
        ctx: &PoseContext,
    ) -> Result<Boundaries, ComputeError> {
        Ok(ctx.boundaries(&[]))
    }

    /// Evaluate one frame
    fn evaluate(
        &self,
        exercise: &ExerciseDescriptor,
        ctx: &PoseContext,
    ) -> Result<EvaluationResult, ComputeError>;
}

/// Look up the strategy for an exercise family
pub fn strategy_for(
    exercise_type: &ExerciseType,
) -> Result<&'static dyn ExerciseStrategy, ComputeError> {
    match exercise_type {
        ExerciseType::Isolation => Ok(&IsolationStrategy),
        ExerciseType::Pinch => Ok(&PinchStrategy),
        ExerciseType::Spread => Ok(&SpreadStrategy),
        ExerciseType::Fist => Ok(&FistStrategy),
        ExerciseType::Flat => Ok(&FlatStrategy),
        ExerciseType::Unknown(name) => Err(ComputeError::UnknownExercise(name.clone())),
    }
}

/// Grade all five fingers as targets (spread and flat)
fn extension_survey(ctx: &PoseContext) -> (Vec<FingerResult>, f64) {
    let fingers: Vec<FingerResult> = Finger::ALL
        .iter()
        .map(|&finger| evaluate_target_finger(finger, &ctx.pose, &ctx.frame))
        .collect();
    let scores: Vec<f64> = fingers.iter().map(|r| r.score).collect();
    let score = mean(&scores);
    (fingers, score)
}

/// Mean distance between adjacent fingertips, in hand widths
fn mean_tip_gap(ctx: &PoseContext) -> f64 {
    let gaps: Vec<f64> = TIP_NODES
        .windows(2)
        .map(|pair| {
            let a = ctx.pose.get(pair[0]);
            let b = ctx.pose.get(pair[1]);
            a.distance_2d(&b) / ctx.frame.hand_width
        })
        .collect();
    mean(&gaps)
}
