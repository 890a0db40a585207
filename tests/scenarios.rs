//! End-to-end scenarios through the public API

use pretty_assertions::assert_eq;

use handform::samples;
use handform::{
    boundaries_for, evaluate, evaluate_json, ErrorTag, EvaluationResult, ExerciseDescriptor,
    ExerciseType, Finger, Landmark, Severity, Zone,
};

fn landmarks_json(landmarks: &[Landmark]) -> String {
    serde_json::to_string(landmarks).unwrap()
}

fn zones(result: &EvaluationResult) -> Vec<(Finger, Zone)> {
    result.fingers.iter().map(|r| (r.finger, r.zone)).collect()
}

#[test]
fn open_hand_spread_is_green() {
    let result = evaluate(&samples::open_hand(), &ExerciseDescriptor::spread());

    assert_eq!(result.exercise, Some(ExerciseType::Spread));
    assert_eq!(result.overall_zone, Zone::Green);
    assert!(result.passed);
    assert!(result.violations.is_empty());
}

#[test]
fn closed_fist_passes_fist() {
    let result = evaluate(&samples::closed_fist(), &ExerciseDescriptor::fist());

    assert!(result.overall_score >= 0.80);
    assert!(result.passed);
    assert_eq!(
        zones(&result),
        vec![
            (Finger::Thumb, Zone::Green),
            (Finger::Index, Zone::Green),
            (Finger::Middle, Zone::Green),
            (Finger::Ring, Zone::Green),
            (Finger::Pinky, Zone::Green),
        ]
    );
}

#[test]
fn index_isolation_with_others_curled() {
    let result = evaluate(
        &samples::point_index(),
        &ExerciseDescriptor::isolation(&[Finger::Index]),
    );

    assert_eq!(result.overall_zone, Zone::Green);
    assert_eq!(result.violations, vec![]);
    assert!(result.passed);

    let targets: Vec<Finger> = result
        .fingers
        .iter()
        .filter(|r| r.is_target)
        .map(|r| r.finger)
        .collect();
    assert_eq!(targets, vec![Finger::Index]);
}

#[test]
fn raised_middle_is_one_major_violation() {
    let clean = evaluate(
        &samples::point_index(),
        &ExerciseDescriptor::isolation(&[Finger::Index]),
    );
    let result = evaluate(
        &samples::point_index_middle_raised(),
        &ExerciseDescriptor::isolation(&[Finger::Index]),
    );

    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].finger, Finger::Middle);
    assert_eq!(result.violations[0].finger_index, 2);
    assert_eq!(result.violations[0].severity, Severity::Major);
    assert!((result.overall_score - clean.overall_score * 0.5).abs() < 1e-12);
    assert!(!result.passed);
    assert!(result.has_major_violation());
}

#[test]
fn coincident_pinch_is_perfect() {
    let result = evaluate(
        &samples::pinch_thumb_index(),
        &ExerciseDescriptor::pinch(Finger::Thumb, Finger::Index),
    );

    assert_eq!(result.overall_zone, Zone::Green);
    assert_eq!(result.overall_score, 1.0);
    assert!(result.passed);
}

#[test]
fn flat_hand_passes_flat() {
    let result = evaluate(&samples::flat_hand(), &ExerciseDescriptor::flat());
    assert!(result.passed);
    assert!(result.overall_score > evaluate(&samples::open_hand(), &ExerciseDescriptor::flat()).overall_score);
}

#[test]
fn short_input_fails_for_every_exercise() {
    let hand = samples::open_hand();
    for exercise in [
        ExerciseDescriptor::isolation(&[Finger::Index]),
        ExerciseDescriptor::pinch(Finger::Thumb, Finger::Index),
        ExerciseDescriptor::spread(),
        ExerciseDescriptor::fist(),
        ExerciseDescriptor::flat(),
    ] {
        for len in [0, 1, 20] {
            let result = evaluate(&hand[..len], &exercise);
            assert_eq!(result.error, Some(ErrorTag::InvalidInput));
            assert_eq!(result.passed, false);
            assert_eq!(result.overall_score, 0.0);
            assert_eq!(result.overall_zone, Zone::Red);
            assert!(result.fingers.is_empty());
        }
    }
}

#[test]
fn unknown_exercise_is_reported() {
    let exercise = ExerciseDescriptor::from_json(r#"{"type": "wave"}"#).unwrap();
    let result = evaluate(&samples::open_hand(), &exercise);

    assert_eq!(result.error, Some(ErrorTag::UnknownExercise));
    assert_eq!(result.message.as_deref(), Some("Unknown exercise type: wave"));
    assert!(!result.passed);
}

#[test]
fn single_target_boundaries_follow_joints() {
    let landmarks = samples::point_index();
    let boundaries =
        boundaries_for(&landmarks, &ExerciseDescriptor::isolation(&[Finger::Index])).unwrap();

    assert!(boundaries.green.is_horizontal());
    assert!(boundaries.acceptable.is_horizontal());
    assert!(boundaries.low.is_horizontal());
    assert_eq!(boundaries.green.start.y, landmarks[6].y);
    assert_eq!(boundaries.acceptable.start.y, landmarks[7].y);
    assert_eq!(boundaries.low.start.y, landmarks[5].y);
}

#[test]
fn json_round_trip_matches_native_call() {
    let native = evaluate(
        &samples::point_index_middle_raised(),
        &ExerciseDescriptor::isolation(&[Finger::Index]),
    );
    let json = evaluate_json(
        &landmarks_json(&samples::point_index_middle_raised()),
        r#"{"type": "isolation", "targetFingers": [1]}"#,
    );
    let parsed: EvaluationResult = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.overall_zone, native.overall_zone);
    assert_eq!(parsed.violations, native.violations);
    assert_eq!(parsed.passed, native.passed);
}

#[test]
fn result_json_shape() {
    let json = evaluate_json(
        &landmarks_json(&samples::point_index_middle_raised()),
        r#"{"type": "isolation", "target_fingers": [1]}"#,
    );
    let payload: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(payload["overall_zone"], "YELLOW");
    assert_eq!(payload["violations"][0]["finger"], "middle");
    assert_eq!(payload["violations"][0]["severity"], "major");
    assert_eq!(payload["fingers"][2]["zone"], "RED");
    assert_eq!(payload["metrics"]["penalty"], 0.5);
}
