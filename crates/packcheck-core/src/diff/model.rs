//! Diff output types.

use serde::{Deserialize, Serialize};

/// One leaf-level difference between two flattened payloads
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum DiffRecord {
    /// Path present on both sides with different raw text
    Changed(String),
    /// Path present only in the reference payload
    Removed(String),
    /// Path present only in the candidate payload
    Added(String),
}

impl DiffRecord {
    pub fn path(&self) -> &str {
        match self {
            DiffRecord::Changed(p) | DiffRecord::Removed(p) | DiffRecord::Added(p) => p,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DiffRecord::Changed(_) => "changed",
            DiffRecord::Removed(_) => "removed",
            DiffRecord::Added(_) => "added",
        }
    }
}

impl std::fmt::Display for DiffRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.label(), self.path())
    }
}

/// A diff record tagged with the archive entry it was found in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDiagnostic {
    pub entry: String,
    pub record: DiffRecord,
}

impl std::fmt::Display for EntryDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.entry, self.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_line_with_entry_and_path() {
        let diag = EntryDiagnostic {
            entry: "Src/Screen1.json".to_string(),
            record: DiffRecord::Changed("items[0].id".to_string()),
        };
        assert_eq!(diag.to_string(), "Src/Screen1.json: changed items[0].id");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&DiffRecord::Added("c".to_string())).unwrap();
        assert_eq!(json, r#"{"kind":"added","path":"c"}"#);
    }
}
