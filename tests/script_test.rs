//! Tests for action scripts: parsing, reference resolution and replay

use std::fs;

use rstest::rstest;
use tempfile::TempDir;

use orgtree::application::{
    load_script, parse_script, replay, resolve_ref, ApplicationError, Session, Verb,
};
use orgtree::cli::CliError;
use orgtree::domain::{DomainError, NodeId, SequentialIds, TreePolicy};
use orgtree::exitcode;
use orgtree::util::testing;

fn session() -> Session {
    testing::init_test_setup();
    Session::new(Box::new(SequentialIds::new()))
}

// ============================================================
// Parsing
// ============================================================

#[rstest]
#[case("sub 1", Verb::Subordinate)]
#[case("subordinate 1", Verb::Subordinate)]
#[case("add-subordinate 1", Verb::Subordinate)]
#[case("branch 1", Verb::BranchMember)]
#[case("add-branch-member 1", Verb::BranchMember)]
#[case("rm 1", Verb::Remove)]
#[case("remove 1", Verb::Remove)]
fn given_verb_alias_when_parsing_then_maps_to_verb(#[case] src: &str, #[case] verb: Verb) {
    let lines = parse_script(src).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].verb, verb);
    assert_eq!(lines[0].target, "1");
}

#[test]
fn given_comments_and_blanks_when_parsing_then_line_numbers_are_kept() {
    let lines = parse_script("# header\n\nsub root\n   # indented comment\nrm 2\n").unwrap();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].line, 3);
    assert_eq!(lines[1].line, 5);
}

#[test]
fn given_unknown_verb_when_parsing_then_reports_line() {
    let err = parse_script("sub root\npromote 2").unwrap_err();
    match err {
        ApplicationError::Script { line, message } => {
            assert_eq!(line, 2);
            assert!(message.contains("promote"), "message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_missing_reference_when_parsing_then_reports_line() {
    let err = parse_script("branch").unwrap_err();
    assert!(matches!(err, ApplicationError::Script { line: 1, .. }));
}

// ============================================================
// Reference resolution
// ============================================================

#[test]
fn given_id_label_and_keyword_when_resolving_then_each_finds_node() {
    let s = testing::session_from_script("sub root\nsub root", TreePolicy::default());
    let tree = s.tree();

    assert_eq!(resolve_ref(tree, "2"), NodeId::from("2"));
    assert_eq!(resolve_ref(tree, "Subordinate 2"), NodeId::from("3"));
    assert_eq!(resolve_ref(tree, "root"), NodeId::from("1"));
    assert_eq!(resolve_ref(tree, "Director"), NodeId::from("1"));
    assert_eq!(resolve_ref(tree, "nobody"), NodeId::from("nobody"));
}

// ============================================================
// Replay
// ============================================================

#[test]
fn given_script_when_replaying_then_builds_expected_chart() {
    let mut s = session();
    let lines = parse_script(
        "sub root\nsub root\nsub root\nbranch Subordinate 2\nbranch Subordinate 2\nrm Subordinate 3",
    )
    .unwrap();

    let mut steps = 0;
    let summary = replay(&mut s, &lines, false, |_, _, _, _| steps += 1).unwrap();

    assert_eq!(steps, 6);
    assert_eq!(summary.applied, 6);
    assert_eq!(summary.ignored, 0);
    assert!(s.tree().find_by_label("Branch member 2/2").is_some());
    assert!(s.tree().find_by_label("Subordinate 3").is_none());
}

#[test]
fn given_bad_reference_when_replaying_leniently_then_action_is_skipped() {
    let mut s = session();
    let lines = parse_script("sub root\nbranch nobody\nsub root").unwrap();

    let summary = replay(&mut s, &lines, false, |_, _, _, _| {}).unwrap();

    assert_eq!(summary.applied, 2);
    assert_eq!(summary.ignored, 1);
    assert_eq!(s.tree().node_count(), 3);
}

#[test]
fn given_bad_reference_when_replaying_strictly_then_stops_with_line() {
    let mut s = session();
    let lines = parse_script("sub root\nbranch root\nsub root").unwrap();

    let err = replay(&mut s, &lines, true, |_, _, _, _| {}).unwrap_err();

    match err {
        ApplicationError::Strict { line, reason } => {
            assert_eq!(line, 2);
            assert!(matches!(reason, DomainError::InvalidTarget { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // the first action stays applied, the third never ran
    assert_eq!(s.tree().node_count(), 2);
}

// ============================================================
// Loading
// ============================================================

#[test]
fn given_script_file_when_loading_then_returns_content() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chart.txt");
    fs::write(&path, "sub root\n").unwrap();

    assert_eq!(load_script(&path).unwrap(), "sub root\n");
}

#[test]
fn given_missing_file_when_loading_then_operation_fails_with_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.txt");

    let err = load_script(&path).unwrap_err();
    assert!(err.to_string().contains("missing.txt"), "error: {err}");
}

#[test]
fn given_non_utf8_script_when_loading_then_script_error_exits_dataerr() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.txt");
    fs::write(&path, b"sub root\nbranch Subordinate \xe9\n").unwrap();

    let err = load_script(&path).unwrap_err();
    assert!(
        matches!(err, ApplicationError::Script { line: 2, .. }),
        "error: {err}"
    );
    assert_eq!(CliError::from(err).exit_code(), exitcode::DATAERR);
}
