#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::archive_of;
use packcheck_core::compare::ArchiveComparator;
use packcheck_core::errors::PackcheckError;
use packcheck_core::logging_facility::test_capture::init_test_capture;
use packcheck_core::{log_op_end, log_op_error, log_op_start};
use packcheck_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_LEAF_PATH,
};
use tracing::Level;

#[test]
fn test_log_op_start_and_end() {
    let capture = init_test_capture();
    let op_name = "packcheck_logging_unique_1";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 42);

    capture.assert_event_exists(op_name, EVENT_START);
    let ends: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].fields.get(FIELD_DURATION_MS), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_carries_code() {
    let capture = init_test_capture();
    let op_name = "packcheck_logging_unique_2";

    let err = PackcheckError::EntryNotFound {
        name: "Header.json".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 3);

    let errors: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].level, Level::ERROR);
    assert_eq!(
        errors[0].fields.get(FIELD_ERR_CODE),
        Some(&"ERR_NOT_FOUND".to_string())
    );
}

#[test]
fn test_comparator_warns_per_record_and_membership() {
    let capture = init_test_capture();
    let a = archive_of(&[
        ("logging_unique_changed.json", r#"{"v":1}"#),
        ("logging_unique_removed.json", "{}"),
    ]);
    let b = archive_of(&[("logging_unique_changed.json", r#"{"v":2}"#)]);

    let result = ArchiveComparator::default().compare(&a, &b);
    assert_eq!(result.diagnostics.len(), 1);

    let changed = capture.warnings_for_entry("logging_unique_changed.json");
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].fields.get(FIELD_LEAF_PATH), Some(&"v".to_string()));
    assert_eq!(changed[0].fields.get("kind"), Some(&"changed".to_string()));

    assert_eq!(
        capture
            .warnings_for_entry("logging_unique_removed.json")
            .len(),
        1
    );
}

#[test]
fn test_comparator_reports_fault_as_error_event() {
    let capture = init_test_capture();
    let a = archive_of(&[("logging_unique_fault.bin", "\u{1}a")]);
    let b = archive_of(&[("logging_unique_fault.bin", "\u{1}b")]);

    let result = ArchiveComparator::default().compare(&a, &b);
    assert!(result.is_fatal());

    let found = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.entry.as_deref() == Some("logging_unique_fault.bin")
            && e.fields.get(FIELD_ERR_CODE).map(String::as_str) == Some("ERR_STRUCTURAL_MISMATCH")
    });
    assert_eq!(found, 1);
}
