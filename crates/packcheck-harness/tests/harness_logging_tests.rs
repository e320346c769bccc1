#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{sample_document, saved, store_harness};
use packcheck_core::logging_facility::test_capture::init_test_capture;
use packcheck_core_types::schema::{EVENT_END, EVENT_START, FIELD_ARCHIVE, FIELD_RUN_ID};
use packcheck_harness::HarnessOptions;
use tempfile::TempDir;

#[test]
fn test_stress_run_events_share_run_id() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let path = saved(dir.path(), "logging_unique.pack", &sample_document());

    assert!(store_harness(HarnessOptions::default()).stress_test(&path));

    let archive = path.display().to_string();
    let starts: Vec<_> = capture
        .events_for_op("stress_test")
        .into_iter()
        .filter(|e| {
            e.event.as_deref() == Some(EVENT_START) && e.fields.get(FIELD_ARCHIVE) == Some(&archive)
        })
        .collect();
    assert_eq!(starts.len(), 1);
    let run_id = starts[0].fields.get(FIELD_RUN_ID).cloned().expect("run_id field");

    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some("stress_test")
            && e.event.as_deref() == Some(EVENT_END)
            && e.fields.get(FIELD_RUN_ID) == Some(&run_id)
    });
    assert_eq!(ends, 1);
}
