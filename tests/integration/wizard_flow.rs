//! Course-creation wizard walkthroughs.

use serde_json::json;

use coursecraft::workflow::{Phase, PhaseData, WorkflowManager, WorkflowSnapshot};
use coursecraft::Error;

use crate::fixtures::{object, valid_payload};

/// Test: rejected submission leaves the wizard where it was
/// Given a fresh wizard
/// When basic info is submitted with a too-short description
/// Then only the description is reported and nothing is stored
#[test]
fn test_short_description_is_rejected() {
    let mut manager = WorkflowManager::new();

    let outcome = manager.complete_phase(
        Phase::BasicInfo,
        object(json!({
            "title": "x",
            "description": "short",
            "category": "c",
            "level": "beginner",
            "duration": 10
        })),
    );

    assert!(!outcome.success);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(
        outcome.errors.get("description").map(String::as_str),
        Some("Description must be at least 50 characters")
    );
    assert_eq!(manager.current_phase(), Phase::BasicInfo);
    assert!(manager.completed_phases().is_empty());
    assert!(manager.all_data().is_empty());
    assert_eq!(manager.validation_errors(Phase::BasicInfo), Some(&outcome.errors));
}

/// Test: valid submission then advance
#[test]
fn test_valid_basic_info_then_next() {
    let mut manager = WorkflowManager::new();

    let outcome = manager.complete_phase(Phase::BasicInfo, valid_payload(Phase::BasicInfo));
    assert!(outcome.success);
    assert!(manager.next_phase());
    assert_eq!(manager.current_phase(), Phase::LearningObjectives);
    assert_eq!(manager.current_phase().to_string(), "learning-objectives");
}

/// Test: full walkthrough
/// Given payloads for every phase
/// When each phase is completed and the wizard advanced
/// Then progress reaches 100 and the wizard stops at the last phase
#[test]
fn test_full_walkthrough() {
    let mut manager = WorkflowManager::new();
    assert_eq!(manager.phase_progress(), 0.0);

    for (i, phase) in Phase::all().iter().enumerate() {
        assert_eq!(manager.current_phase(), *phase);
        assert!(manager.complete_phase(*phase, valid_payload(*phase)).success);
        let expected = 100.0 * (i + 1) as f64 / 5.0;
        assert!((manager.phase_progress() - expected).abs() < f64::EPSILON);
        manager.next_phase();
    }

    assert_eq!(manager.current_phase(), Phase::ReviewFinalize);
    assert_eq!(manager.phase_progress(), 100.0);
    assert!(manager.is_complete());
    assert_eq!(manager.all_data().len(), 5);

    // The last phase is not terminal: the wizard can still step back.
    assert!(!manager.next_phase());
    assert!(manager.previous_phase());
    assert_eq!(manager.current_phase(), Phase::ContentCreation);
}

/// Test: reachability matches the navigation rule for every phase
#[test]
fn test_reachability_rule_for_all_phases() {
    let mut manager = WorkflowManager::new();
    manager.next_phase();
    manager.next_phase();
    manager.next_phase();
    assert!(manager
        .complete_phase(Phase::ContentCreation, valid_payload(Phase::ContentCreation))
        .success);
    manager.move_to_phase(Phase::BasicInfo).unwrap();

    for phase in Phase::all() {
        let expected = phase.index() <= 1 || manager.is_phase_completed(*phase);
        assert_eq!(
            manager.can_proceed_to_phase(*phase),
            expected,
            "reachability of {}",
            phase
        );
    }
    assert!(manager.can_proceed_to_phase(Phase::ContentCreation));
    assert!(!manager.can_proceed_to_phase(Phase::OutlineGeneration));
}

/// Test: forward jump is a hard error
#[test]
fn test_forward_jump_is_an_error() {
    let mut manager = WorkflowManager::new();
    let err = manager.move_to_phase(Phase::ReviewFinalize).unwrap_err();

    match err {
        Error::InvalidPhaseTransition { from, to } => {
            assert_eq!(from, "basic-info");
            assert_eq!(to, "review-finalize");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(manager.current_phase(), Phase::BasicInfo);
}

/// Test: reset after partial progress
#[test]
fn test_reset_after_progress() {
    let mut manager = WorkflowManager::new();
    manager.complete_phase(Phase::BasicInfo, valid_payload(Phase::BasicInfo));
    manager.next_phase();
    manager.complete_phase(Phase::LearningObjectives, PhaseData::new());

    manager.reset();

    let fresh = WorkflowManager::new();
    assert_eq!(manager.current_phase(), fresh.current_phase());
    assert_eq!(manager.completed_phases(), fresh.completed_phases());
    assert_eq!(manager.all_data(), fresh.all_data());
    for phase in Phase::all() {
        assert!(manager.validation_errors(*phase).is_none());
    }
    assert_eq!(manager.phase_progress(), 0.0);
}

/// Test: a saved draft resumes where it stopped
#[test]
fn test_snapshot_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.json");

    let mut manager = WorkflowManager::new();
    manager.complete_phase(Phase::BasicInfo, valid_payload(Phase::BasicInfo));
    manager.next_phase();
    manager.complete_phase(Phase::LearningObjectives, object(json!({"objectives": ["one"]})));
    std::fs::write(&path, serde_json::to_string(&manager.snapshot()).unwrap()).unwrap();

    let saved: WorkflowSnapshot =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let mut resumed = WorkflowManager::restore(saved).unwrap();

    assert_eq!(resumed.current_phase(), Phase::LearningObjectives);
    assert!(resumed.is_phase_completed(Phase::BasicInfo));
    assert!(resumed
        .validation_errors(Phase::LearningObjectives)
        .unwrap()
        .contains_key("objectives"));

    assert!(resumed
        .complete_phase(Phase::LearningObjectives, valid_payload(Phase::LearningObjectives))
        .success);
    assert!(resumed.validation_errors(Phase::LearningObjectives).is_none());
    assert_eq!(resumed.phase_progress(), 40.0);
}
