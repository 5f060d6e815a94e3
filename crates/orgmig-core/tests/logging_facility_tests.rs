#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{repo, snapshot};
use orgmig_core::errors::MigrateError;
use orgmig_core::logging_facility::test_capture::init_test_capture;
use orgmig_core::{log_op_end, log_op_error, log_op_start};
use orgmig_core::{DiffEngine, RepoRecord, Stage};
use orgmig_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(starts, 1, "Should have captured exactly one start event");
}

#[test]
fn test_log_op_end_records_duration_and_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42, rows = 7);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field("duration_ms"), Some("42"));
    assert_eq!(events[0].field("rows"), Some("7"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = MigrateError::MissingLogMarker {
        log: "widgets".to_string(),
        marker: "Migration started".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let events = capture.events_for_op(op_name);
    assert_eq!(events[0].field("err.code"), Some("ERR_INVALID_LOG"));
    assert_eq!(events[0].field("err.kind"), Some("InvalidLog"));
}

#[test]
fn test_compare_emits_one_start_and_one_end() {
    let capture = init_test_capture();
    let stage = Stage::Other("logging-check-baseline".to_string());

    let baseline = snapshot(stage, vec![repo("r1", "acme", &[("visibility", "private")])]);
    let candidate = snapshot(
        Stage::AfterTarget,
        vec![repo("r1", "acme", &[("visibility", "public")])],
    );
    DiffEngine::default()
        .compare(&baseline, &candidate, None)
        .unwrap();

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some("compare")
            && e.event.as_deref() == Some(EVENT_START)
            && e.field("stage") == Some("logging-check-baseline")
    });
    assert_eq!(starts, 1);

    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("compare")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field("discrepancies") == Some("1")
    });
    assert_eq!(ends, 1);
}

#[test]
fn test_failed_compare_emits_end_error() {
    let capture = init_test_capture();

    let baseline = snapshot(
        Stage::Other("logging-check-failure".to_string()),
        vec![repo("r1", "acme", &[])],
    );
    let keyless = snapshot(
        Stage::AfterTarget,
        vec![RepoRecord::new().with_field("id", "1")],
    );
    let err = DiffEngine::default()
        .compare(&baseline, &keyless, None)
        .unwrap_err();
    assert_eq!(err.code(), "ERR_MALFORMED_SNAPSHOT");

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("compare")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field("err.code") == Some("ERR_MALFORMED_SNAPSHOT")
    });
    assert_eq!(errors, 1);
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();

    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_load_snapshot_start_event_carries_path() {
    let capture = init_test_capture();
    let dir = tempfile::TempDir::new().unwrap();
    let path = common::write_file(
        dir.path(),
        "logging-check-wave-9.csv",
        "name,owner.login\nr1,acme\n",
    );

    let snapshot = orgmig_core::load_snapshot(&path).unwrap();
    assert_eq!(snapshot.len(), 1);

    let expected = path.display().to_string();
    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some("load_snapshot")
            && e.event.as_deref() == Some(EVENT_START)
            && e.field("path") == Some(expected.as_str())
    });
    assert_eq!(starts, 1);
}
