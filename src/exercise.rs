//! Exercise descriptors
//!
//! An exercise descriptor names the pose family to evaluate and, where the
//! family needs it, which fingers are involved. Descriptors come from an
//! external catalog and are consumed read-only.

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::types::{Finger, TIP_NODES, INDEX_TIP, THUMB_TIP};

/// Tip pair used when a pinch descriptor omits `pinch_pair`
pub const DEFAULT_PINCH_PAIR: [usize; 2] = [THUMB_TIP, INDEX_TIP];

/// Pose family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    /// Extend the target fingers, keep the others relaxed
    Isolation,
    /// Bring two fingertips together
    Pinch,
    /// Open the hand with the fingers apart
    Spread,
    /// Curl every finger into the palm
    Fist,
    /// Open the hand with the fingers together
    Flat,
    /// Anything the evaluator does not know about
    #[serde(untagged)]
    Unknown(String),
}

impl ExerciseType {
    pub fn as_str(&self) -> &str {
        match self {
            ExerciseType::Isolation => "isolation",
            ExerciseType::Pinch => "pinch",
            ExerciseType::Spread => "spread",
            ExerciseType::Fist => "fist",
            ExerciseType::Flat => "flat",
            ExerciseType::Unknown(name) => name.as_str(),
        }
    }
}

/// Declarative exercise request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDescriptor {
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    /// Finger indices (0-4) that must be active (isolation)
    #[serde(default, alias = "targetFingers", skip_serializing_if = "Option::is_none")]
    pub target_fingers: Option<Vec<usize>>,
    /// Two fingertip landmark indices from {4, 8, 12, 16, 20} (pinch)
    #[serde(default, alias = "pinchPair", skip_serializing_if = "Option::is_none")]
    pub pinch_pair: Option<Vec<usize>>,
}

impl ExerciseDescriptor {
    pub fn new(exercise_type: ExerciseType) -> Self {
        Self {
            exercise_type,
            target_fingers: None,
            pinch_pair: None,
        }
    }

    pub fn isolation(targets: &[Finger]) -> Self {
        Self {
            target_fingers: Some(targets.iter().map(|f| f.index()).collect()),
            ..Self::new(ExerciseType::Isolation)
        }
    }

    pub fn pinch(a: Finger, b: Finger) -> Self {
        Self {
            pinch_pair: Some(vec![a.tip(), b.tip()]),
            ..Self::new(ExerciseType::Pinch)
        }
    }

    pub fn spread() -> Self {
        Self::new(ExerciseType::Spread)
    }

    pub fn fist() -> Self {
        Self::new(ExerciseType::Fist)
    }

    pub fn flat() -> Self {
        Self::new(ExerciseType::Flat)
    }

    /// Parse a descriptor from JSON
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Target fingers in ascending order, duplicates removed.
    ///
    /// A missing list is treated as empty.
    pub fn targets(&self) -> Result<Vec<Finger>, ComputeError> {
        let raw = self.target_fingers.as_deref().unwrap_or(&[]);
        let mut fingers = Vec::with_capacity(raw.len());
        for &index in raw {
            let finger = Finger::from_index(index).ok_or_else(|| {
                ComputeError::InvalidExercise(format!(
                    "target finger {index} is outside 0-4"
                ))
            })?;
            fingers.push(finger);
        }
        fingers.sort();
        fingers.dedup();
        Ok(fingers)
    }

    /// Fingers owning the two pinch tips, falling back to thumb + index
    pub fn pinch_fingers(&self) -> Result<(Finger, Finger), ComputeError> {
        let pair = self.pinch_pair.as_deref().unwrap_or(&DEFAULT_PINCH_PAIR);
        if pair.len() != 2 {
            return Err(ComputeError::InvalidExercise(format!(
                "pinch_pair needs exactly 2 tip nodes, got {}",
                pair.len()
            )));
        }
        let lookup = |node: usize| {
            Finger::from_tip_node(node).ok_or_else(|| {
                ComputeError::InvalidExercise(format!(
                    "pinch node {node} is not one of {TIP_NODES:?}"
                ))
            })
        };
        let a = lookup(pair[0])?;
        let b = lookup(pair[1])?;
        if a == b {
            return Err(ComputeError::InvalidExercise(format!(
                "pinch_pair must name two different tips, got {} twice",
                pair[0]
            )));
        }
        Ok((a, b))
    }

    /// Check the descriptor against the needs of its exercise family
    pub fn validate(&self) -> Result<(), ComputeError> {
        match &self.exercise_type {
            ExerciseType::Isolation => {
                if self.targets()?.is_empty() {
                    return Err(ComputeError::InvalidExercise(
                        "isolation requires at least one target finger".to_string(),
                    ));
                }
                Ok(())
            }
            ExerciseType::Pinch => self.pinch_fingers().map(|_| ()),
            ExerciseType::Spread | ExerciseType::Fist | ExerciseType::Flat => Ok(()),
            ExerciseType::Unknown(name) => Err(ComputeError::UnknownExercise(name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_descriptor() {
        let desc =
            ExerciseDescriptor::from_json(r#"{"type": "isolation", "targetFingers": [2, 1, 1]}"#)
                .unwrap();
        assert_eq!(desc.exercise_type, ExerciseType::Isolation);
        assert_eq!(desc.targets().unwrap(), vec![Finger::Index, Finger::Middle]);
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let desc = ExerciseDescriptor::from_json(r#"{"type": "wave"}"#).unwrap();
        assert_eq!(desc.exercise_type, ExerciseType::Unknown("wave".to_string()));
        assert!(matches!(
            desc.validate(),
            Err(ComputeError::UnknownExercise(name)) if name == "wave"
        ));
    }

    #[test]
    fn test_target_out_of_range() {
        let desc = ExerciseDescriptor {
            target_fingers: Some(vec![1, 7]),
            ..ExerciseDescriptor::new(ExerciseType::Isolation)
        };
        assert!(matches!(desc.validate(), Err(ComputeError::InvalidExercise(_))));
    }

    #[test]
    fn test_isolation_requires_targets() {
        let desc = ExerciseDescriptor::new(ExerciseType::Isolation);
        assert!(desc.validate().is_err());
    }

    #[test]
    fn test_pinch_pair_default_and_validation() {
        let desc = ExerciseDescriptor::new(ExerciseType::Pinch);
        assert_eq!(desc.pinch_fingers().unwrap(), (Finger::Thumb, Finger::Index));

        let desc = ExerciseDescriptor::from_json(r#"{"type": "pinch", "pinchPair": [4, 9]}"#)
            .unwrap();
        assert!(desc.validate().is_err());

        let desc = ExerciseDescriptor::from_json(r#"{"type": "pinch", "pinch_pair": [8, 8]}"#)
            .unwrap();
        assert!(desc.validate().is_err());

        let desc = ExerciseDescriptor::pinch(Finger::Thumb, Finger::Ring);
        assert_eq!(desc.pinch_pair, Some(vec![4, 16]));
        assert!(desc.validate().is_ok());
    }

    #[test]
    fn test_descriptor_round_trips_type_name() {
        let json = serde_json::to_string(&ExerciseDescriptor::fist()).unwrap();
        assert_eq!(json, r#"{"type":"fist"}"#);
    }
}
