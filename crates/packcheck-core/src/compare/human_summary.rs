use crate::compare::result::{ComparisonResult, MembershipChange};
use std::fmt::Write;

/// Render a comparison as plain text, one line per finding.
///
/// Identical archives render as a single `identical` line.
pub fn render_human_summary(result: &ComparisonResult) -> String {
    let mut out = String::new();
    if result.is_identical() {
        let _ = writeln!(out, "identical ({})", result.hash_a);
        return out;
    }

    for diagnostic in &result.diagnostics {
        let _ = writeln!(out, "{diagnostic}");
    }
    for change in &result.membership {
        let _ = match change {
            MembershipChange::EntryAdded(entry) => writeln!(out, "{entry}: entry added"),
            MembershipChange::EntryRemoved(entry) => writeln!(out, "{entry}: entry removed"),
        };
    }
    if let Some(fault) = &result.fault {
        let _ = writeln!(out, "FAIL {}: {}", fault.entry, fault.reason);
    }
    out
}
