//! End-to-end tests for the detect-then-resolve pipeline.
//!
//! These exercise the real `ConflictManager` with the stock wiring plus
//! the optional detectors and resolvers, feeding in change sets the way
//! the editor layer would. Everything is in-memory; there is no I/O.

use studiosync_core::{
    default_manager, AdjacentConflictDetector, CodeChange, ConflictLocation, ConflictManager,
    ConflictSeverity, ConflictType, DetectionUpdate, ImportConflictDetector, MergeResolver,
    RelatedConflictDetector, ResolutionStrategy, ResolutionUpdate, SequentialResolver,
    TakeFirstResolver, TakeSecondResolver,
};

// ===========================================================================
// Helpers
// ===========================================================================

fn change(file: &str, start: u32, end: u32, original: &str, modified: &str) -> CodeChange {
    CodeChange::new(original, modified, ConflictLocation::in_file(file, start, end))
}

/// A manager with every built-in detector and resolver registered.
fn full_manager() -> ConflictManager {
    let mut manager = default_manager();
    manager.register_detector(Box::new(AdjacentConflictDetector::new()));
    manager.register_detector(Box::new(ImportConflictDetector::new()));
    manager.register_detector(Box::new(RelatedConflictDetector::new()));
    manager.register_resolver(Box::new(TakeFirstResolver::new()));
    manager.register_resolver(Box::new(TakeSecondResolver::new()));
    manager.register_resolver(Box::new(SequentialResolver::new()));
    manager
}

// ===========================================================================
// Stock pipeline
// ===========================================================================

#[test]
fn test_overlap_detected_and_resolved_end_to_end() {
    let manager = default_manager();

    let ours = change("src/App.tsx", 3, 5, "const n = 1;", "const n = 2;");
    let theirs = change("src/App.tsx", 3, 5, "const n = 1;", "const n = 2;");

    let conflicts = manager.detect_conflicts(&[ours], &[theirs]);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].conflict_type, ConflictType::Overlapping);
    assert_eq!(conflicts[0].location.start_line, 3);
    assert_eq!(conflicts[0].location.end_line, 5);

    let resolutions = manager.resolve_conflicts(&conflicts);
    assert_eq!(resolutions.len(), 1);
    assert!(resolutions[0].success);
    assert_eq!(resolutions[0].resolved_code.as_deref(), Some("const n = 2;"));
}

#[test]
fn test_disabling_auto_resolve_fails_the_same_scenario() {
    let mut manager = default_manager();
    manager.configure_resolution(&ResolutionUpdate::auto_resolve(false));

    let ours = change("src/App.tsx", 3, 5, "const n = 1;", "const n = 2;");
    let theirs = change("src/App.tsx", 3, 5, "const n = 1;", "const n = 3;");

    let outcome = manager.process_changes(&[ours], &[theirs]);
    assert_eq!(outcome.resolutions.len(), 1);
    let result = &outcome.resolutions[0];
    assert!(!result.success);
    assert_eq!(result.strategy, ResolutionStrategy::Manual);
    assert!(result.error.as_deref().unwrap().contains("disabled"));
}

#[test]
fn test_changes_in_different_files_never_conflict() {
    let manager = full_manager();

    let ours = change("src/App.tsx", 1, 5, "a", "b");
    let theirs = change("src/Button.tsx", 1, 5, "a", "c");

    let outcome = manager.process_changes(&[ours], &[theirs]);
    assert!(outcome.conflicts.is_empty());
    assert!(outcome.resolutions.is_empty());
}

#[test]
fn test_three_way_merge_keeps_both_compatible_edits() {
    let manager = default_manager();
    let base = "function App() {\n  return null;\n}";

    let ours = change(
        "src/App.tsx",
        1,
        3,
        base,
        "function App(props) {\n  return null;\n}",
    );
    let theirs = change(
        "src/App.tsx",
        1,
        3,
        base,
        "function App() {\n  return <div />;\n}",
    );

    let outcome = manager.process_changes(&[ours], &[theirs]);
    assert_eq!(outcome.resolved_count(), 1);

    let code = outcome.resolutions[0].resolved_code.as_deref().unwrap();
    assert!(code.contains("function App(props) {"));
    assert!(code.contains("return <div />;"));
    assert!(!code.contains("<<<<<<<"));
}

// ===========================================================================
// Extended wiring
// ===========================================================================

#[test]
fn test_adjacent_changes_flow_through_the_merge_resolver() {
    let mut manager = full_manager();
    // Tighten the gap so only truly neighboring edits count.
    manager.configure_detection(&DetectionUpdate::adjacency_threshold(2));

    let ours = change("src/App.tsx", 10, 11, "a", "const [open, setOpen] = useState(false);");
    let theirs = change("src/App.tsx", 13, 14, "b", "const [name, setName] = useState('');");

    let outcome = manager.process_changes(&[ours], &[theirs]);
    assert_eq!(outcome.conflicts.len(), 1);
    assert_eq!(outcome.conflicts[0].conflict_type, ConflictType::Adjacent);

    let result = &outcome.resolutions[0];
    assert!(result.success);
    assert_eq!(
        result.resolved_code.as_deref(),
        Some("const [open, setOpen] = useState(false);\n\nconst [name, setName] = useState('');")
    );
}

#[test]
fn test_import_conflicts_union_and_sort() {
    let mut manager = ConflictManager::new();
    manager.register_detector(Box::new(ImportConflictDetector::new()));
    manager.register_resolver(Box::new(MergeResolver::new()));

    let ours = change(
        "src/App.tsx",
        1,
        2,
        "import a;",
        "import a;\nimport b;",
    );
    let theirs = change(
        "src/App.tsx",
        1,
        2,
        "import a;",
        "import b;\nimport c;",
    );

    let outcome = manager.process_changes(&[ours], &[theirs]);
    assert_eq!(outcome.conflicts.len(), 1);
    assert_eq!(outcome.conflicts[0].conflict_type, ConflictType::Import);
    assert_eq!(
        outcome.resolutions[0].resolved_code.as_deref(),
        Some("import a;\nimport b;\nimport c;")
    );
}

#[test]
fn test_related_changes_detected_via_code_unit() {
    let mut manager = ConflictManager::new();
    manager.register_detector(Box::new(RelatedConflictDetector::new()));
    manager.register_resolver(Box::new(MergeResolver::new()));

    let mut ours = change("src/App.tsx", 5, 7, "a", "A\nX\nC");
    ours.location.code_unit = Some("App".into());
    let mut theirs = change("src/App.tsx", 20, 22, "b", "A\nY\nC");
    theirs.location.code_unit = Some("App".into());

    let outcome = manager.process_changes(&[ours], &[theirs]);
    assert_eq!(outcome.conflicts.len(), 1);
    assert_eq!(outcome.conflicts[0].conflict_type, ConflictType::Related);

    let result = &outcome.resolutions[0];
    assert!(result.success);
    assert!(result.warnings[0].contains("placeholder"));
}

#[test]
fn test_suggested_take_strategies_win_over_default() {
    let manager = full_manager();

    let conflicts = manager.detect_conflicts(
        &[change("src/App.tsx", 1, 1, "old", "ours wins")],
        &[change("src/App.tsx", 1, 1, "old", "theirs wins")],
    );
    assert_eq!(conflicts.len(), 1);

    let take_first = conflicts[0]
        .clone()
        .with_suggested_strategy(ResolutionStrategy::TakeFirst);
    let result = manager.resolve_conflict(&take_first);
    assert!(result.success);
    assert_eq!(result.resolved_code.as_deref(), Some("ours wins"));

    let take_second = conflicts[0]
        .clone()
        .with_suggested_strategy(ResolutionStrategy::TakeSecond);
    let result = manager.resolve_conflict(&take_second);
    assert!(result.success);
    assert_eq!(result.resolved_code.as_deref(), Some("theirs wins"));
}

#[test]
fn test_critical_severity_forces_manual_review() {
    let manager = full_manager();

    let conflicts = manager.detect_conflicts(
        &[change("src/App.tsx", 1, 3, "old", "completely new body")],
        &[change("src/App.tsx", 1, 3, "old", "different new body")],
    );
    assert_eq!(conflicts.len(), 1);

    let mut critical = conflicts[0].clone();
    critical.severity = ConflictSeverity::Critical;

    // No registered resolver claims an unsuggested CRITICAL conflict.
    let result = manager.resolve_conflict(&critical);
    assert!(!result.success);
    assert_eq!(result.strategy, ResolutionStrategy::Manual);

    // Even an explicit merge suggestion is rejected by the resolver itself.
    let suggested = critical.with_suggested_strategy(ResolutionStrategy::Merge);
    let result = manager.resolve_conflict(&suggested);
    assert!(!result.success);
}

#[test]
fn test_threshold_and_defaults_survive_reconfiguration() {
    let mut manager = full_manager();
    manager.configure_resolution(&ResolutionUpdate::auto_resolve_threshold(
        ConflictSeverity::Medium,
    ));
    manager.configure_resolution(&ResolutionUpdate {
        attempt_semantic_merge: Some(false),
        ..ResolutionUpdate::default()
    });

    // The threshold from the earlier update is still in force.
    assert_eq!(
        manager.resolution_options().auto_resolve_threshold,
        Some(ConflictSeverity::Medium)
    );
    assert!(!manager.resolution_options().attempt_semantic_merge);
    assert_eq!(
        manager.resolution_options().default_strategy,
        ResolutionStrategy::Merge
    );
}
