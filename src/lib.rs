//! Handform - Per-frame hand pose evaluator for rehabilitation exercises
//!
//! Handform takes a 21-point hand landmark snapshot from a pose tracker and an
//! exercise descriptor, and grades the pose through a deterministic pipeline:
//! landmark validation → hand frame normalization → boundary construction →
//! finger classification → exercise scoring.
//!
//! ## Modules
//!
//! - **Pipeline**: `evaluate`, `evaluate_json` and the `Evaluator` service object
//! - **Strategies**: isolation, pinch, spread, fist and flat scoring
//! - **Reports**: results wrapped with producer metadata for streaming

pub mod boundary;
pub mod classifier;
pub mod config;
pub mod error;
pub mod exercise;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod samples;
pub mod scoring;
pub mod strategy;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use boundary::{Boundaries, BoundaryLevel, BoundaryLine};
pub use config::EvaluatorConfig;
pub use error::{ComputeError, ErrorTag};
pub use exercise::{ExerciseDescriptor, ExerciseType};
pub use pipeline::{boundaries_for, evaluate, evaluate_json, Evaluator};
pub use report::{FrameRecord, FrameReport, ReportEncoder};
pub use types::{EvaluationResult, Finger, FingerResult, Landmark, Severity, Violation, Zone};

/// Handform version embedded in every report
pub const HANDFORM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "handform";
