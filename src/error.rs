//! Error types for Handform

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during evaluation
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Invalid landmark input: {0}")]
    InvalidInput(String),

    #[error("Unknown exercise type: {0}")]
    UnknownExercise(String),

    #[error("Invalid exercise descriptor: {0}")]
    InvalidExercise(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ComputeError {
    /// Machine-readable tag carried by failure results
    pub fn tag(&self) -> ErrorTag {
        match self {
            ComputeError::InvalidInput(_) | ComputeError::JsonError(_) => ErrorTag::InvalidInput,
            ComputeError::UnknownExercise(_) => ErrorTag::UnknownExercise,
            ComputeError::InvalidExercise(_) | ComputeError::ConfigError(_) => {
                ErrorTag::InvalidExercise
            }
        }
    }
}

/// Error tag attached to a failing `EvaluationResult`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorTag {
    InvalidInput,
    UnknownExercise,
    InvalidExercise,
}

impl ErrorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorTag::InvalidInput => "invalid_input",
            ErrorTag::UnknownExercise => "unknown_exercise",
            ErrorTag::InvalidExercise => "invalid_exercise",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_tags() {
        assert_eq!(
            ComputeError::InvalidInput("short".into()).tag(),
            ErrorTag::InvalidInput
        );
        assert_eq!(
            ComputeError::UnknownExercise("wave".into()).tag(),
            ErrorTag::UnknownExercise
        );
        assert_eq!(ErrorTag::InvalidExercise.as_str(), "invalid_exercise");
    }

    #[test]
    fn test_json_error_is_invalid_input() {
        let err: ComputeError = serde_json::from_str::<Vec<f64>>("nope").unwrap_err().into();
        assert_eq!(err.tag(), ErrorTag::InvalidInput);
        assert!(err.to_string().starts_with("Invalid JSON"));
    }
}
