//! Fault and panic containment for harness stages.

use packcheck_core::errors::Result;
use packcheck_core::log_op_error;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic payload".to_string()
    }
}

/// Run `f`, turning an error or a panic into a logged `false`
pub(crate) fn guarded<F>(op: &str, run_id: &str, f: F) -> bool
where
    F: FnOnce() -> Result<bool>,
{
    let start = Instant::now();
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(passed)) => passed,
        Ok(Err(e)) => {
            log_op_error!(
                op,
                e,
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = run_id
            );
            false
        }
        Err(payload) => {
            tracing::error!(
                op,
                run_id,
                panic = %panic_message(payload),
                "stage panicked"
            );
            false
        }
    }
}
