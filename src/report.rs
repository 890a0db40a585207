//! Frame reports
//!
//! This module wraps evaluation results with producer metadata and timing so
//! streamed verdicts can be traced back to the frame and process that made
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ComputeError;
use crate::exercise::ExerciseDescriptor;
use crate::pipeline::Evaluator;
use crate::types::{EvaluationResult, Landmark};
use crate::{HANDFORM_VERSION, PRODUCER_NAME};

/// Caller-supplied frame identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameId {
    Number(u64),
    Text(String),
}

/// One landmark snapshot as read from a file or stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<FrameId>,
    /// Capture time (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub landmarks: Vec<Landmark>,
}

impl FrameRecord {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            frame_id: None,
            timestamp: None,
            landmarks,
        }
    }

    /// Parse a frame record from JSON
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        serde_json::from_str(json)
            .map_err(|e| ComputeError::InvalidInput(format!("frame record: {e}")))
    }
}

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Evaluation result with provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub producer: Producer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<FrameId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at_utc: Option<String>,
    pub computed_at_utc: String,
    pub result: EvaluationResult,
}

/// Report encoder tagging every report with the same instance ID
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Wrap a result computed for `record`
    pub fn encode(&self, record: &FrameRecord, result: EvaluationResult) -> FrameReport {
        FrameReport {
            producer: Producer {
                name: PRODUCER_NAME.to_string(),
                version: HANDFORM_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            frame_id: record.frame_id.clone(),
            observed_at_utc: record.timestamp.map(|t| t.to_rfc3339()),
            computed_at_utc: Utc::now().to_rfc3339(),
            result,
        }
    }

    /// Evaluate a record and wrap the result
    pub fn evaluate(
        &self,
        evaluator: &Evaluator,
        record: &FrameRecord,
        exercise: &ExerciseDescriptor,
    ) -> FrameReport {
        let result = evaluator.evaluate(&record.landmarks, exercise);
        self.encode(record, result)
    }

    /// Encode to compact JSON (one line, NDJSON friendly)
    pub fn encode_to_json(&self, report: &FrameReport) -> Result<String, ComputeError> {
        serde_json::to_string(report).map_err(ComputeError::JsonError)
    }
}
