//! Two-pass archive reconciliation.

use crate::archive::{read_archive, Archive};
use crate::checksum::{whole_archive_hash, ContentHasher};
use crate::compare::dump::dump_mismatch;
use crate::compare::options::CompareOptions;
use crate::compare::result::{ComparisonResult, MembershipChange, StructuralFault};
use crate::diff::{semantic_diff, EntryDiagnostic};
use crate::errors::Result;
use crate::flatten::flatten;
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Structural comparator for two archives.
///
/// Holds only configuration; every `compare` call builds its own
/// reconciliation map, so one comparator can be reused freely.
#[derive(Debug, Clone)]
pub struct ArchiveComparator {
    hasher: ContentHasher,
    dump_dir: Option<PathBuf>,
}

impl Default for ArchiveComparator {
    fn default() -> Self {
        Self::new(&CompareOptions::default())
    }
}

impl ArchiveComparator {
    pub fn new(options: &CompareOptions) -> Self {
        Self {
            hasher: options.hasher(),
            dump_dir: options.dump_dir.clone(),
        }
    }

    /// Compare a reference archive `a` with a candidate archive `b`.
    ///
    /// 1. Equal whole-archive hashes → identical, nothing else inspected.
    /// 2. Pass 1 records the hash of every comparable entry of `a`.
    /// 3. Pass 2 walks `b`: equal hashes are consumed silently, differing
    ///    hashes are flattened and diffed, unknown names are reported added.
    /// 4. Names left over from pass 1 are reported removed.
    ///
    /// A differing entry that is not structured text on either side raises a
    /// [`StructuralFault`] and ends the comparison.
    pub fn compare(&self, a: &Archive, b: &Archive) -> ComparisonResult {
        log_op_start!("compare", entry_count_a = a.len(), entry_count_b = b.len());
        let start = Instant::now();

        let hash_a = whole_archive_hash(a, &self.hasher);
        let hash_b = whole_archive_hash(b, &self.hasher);
        if hash_a == hash_b {
            log_op_end!(
                "compare",
                duration_ms = start.elapsed().as_millis() as u64,
                short_circuited = true
            );
            return ComparisonResult::identical(hash_a);
        }

        let mut result = ComparisonResult {
            hash_a,
            hash_b,
            short_circuited: false,
            diagnostics: Vec::new(),
            membership: Vec::new(),
            fault: None,
        };

        // Pass 1: reference
        let mut seen: BTreeMap<&str, String> = a
            .sorted_entries()
            .filter_map(|entry| {
                self.hasher
                    .hash(entry.name(), entry.data())
                    .map(|hash| (entry.name(), hash))
            })
            .collect();

        // Pass 2: candidate
        for entry in b.sorted_entries() {
            let name = entry.name();
            let Some(hash) = self.hasher.hash(name, entry.data()) else {
                continue;
            };

            match seen.get(name).cloned() {
                Some(reference_hash) if reference_hash == hash => {
                    seen.remove(name);
                }
                Some(_) => {
                    let reference = a.get(name).unwrap_or_default();
                    if let Some(dir) = &self.dump_dir {
                        dump_mismatch(dir, name, reference, entry.data());
                    }
                    match self.diff_entry(name, reference, entry.data()) {
                        Ok(diagnostics) => {
                            if diagnostics.is_empty() {
                                tracing::debug!(
                                    entry = name,
                                    "hash mismatch without structural difference"
                                );
                            }
                            result.diagnostics.extend(diagnostics);
                            seen.remove(name);
                        }
                        Err(fault) => {
                            let err: crate::errors::ExError = fault.clone().into();
                            log_op_error!(
                                "compare",
                                err,
                                duration_ms = start.elapsed().as_millis() as u64,
                                entry = name
                            );
                            result.fault = Some(fault);
                            return result;
                        }
                    }
                }
                None => {
                    tracing::warn!(entry = name, "entry present only in candidate archive");
                    result
                        .membership
                        .push(MembershipChange::EntryAdded(name.to_string()));
                }
            }
        }

        for name in seen.into_keys() {
            tracing::warn!(entry = name, "entry missing from candidate archive");
            result
                .membership
                .push(MembershipChange::EntryRemoved(name.to_string()));
        }

        log_op_end!(
            "compare",
            duration_ms = start.elapsed().as_millis() as u64,
            diagnostic_count = result.diagnostics.len(),
            membership_count = result.membership.len()
        );
        result
    }

    fn diff_entry(
        &self,
        name: &str,
        a: &[u8],
        b: &[u8],
    ) -> std::result::Result<Vec<EntryDiagnostic>, StructuralFault> {
        let fault = |side: &str, e: crate::flatten::FlattenError| StructuralFault {
            entry: name.to_string(),
            reason: format!("{side} side: {e}"),
        };
        let flat_a = flatten(a).map_err(|e| fault("reference", e))?;
        let flat_b = flatten(b).map_err(|e| fault("candidate", e))?;

        Ok(semantic_diff(&flat_a, &flat_b)
            .into_iter()
            .map(|record| {
                tracing::warn!(
                    entry = name,
                    leaf_path = record.path(),
                    kind = record.label(),
                    "structural difference"
                );
                EntryDiagnostic {
                    entry: name.to_string(),
                    record,
                }
            })
            .collect())
    }
}

/// Read two archive files and compare them.
///
/// # Errors
///
/// Returns an error only when an archive cannot be read; content
/// differences, including faults, are reported in the result.
pub fn compare_archives(
    path_a: &Path,
    path_b: &Path,
    options: &CompareOptions,
) -> Result<ComparisonResult> {
    let a = read_archive(path_a)?;
    let b = read_archive(path_b)?;
    Ok(ArchiveComparator::new(options).compare(&a, &b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::HashStrategy;
    use crate::diff::DiffRecord;

    fn archive(entries: &[(&str, &str)]) -> Archive {
        Archive::from_entries(entries.iter().map(|(n, d)| (*n, d.as_bytes().to_vec()))).unwrap()
    }

    fn raw() -> ArchiveComparator {
        ArchiveComparator::new(&CompareOptions::default().with_strategy(HashStrategy::Raw))
    }

    #[test]
    fn test_self_compare_short_circuits() {
        let a = archive(&[("a.json", r#"{"x":1}"#)]);
        let result = raw().compare(&a, &a);
        assert!(result.is_identical());
        assert!(result.short_circuited);
    }

    #[test]
    fn test_changed_leaf_is_tagged_with_entry() {
        let a = archive(&[("a.json", r#"{"x":1}"#)]);
        let b = archive(&[("a.json", r#"{"x":2}"#)]);
        let result = raw().compare(&a, &b);
        assert_eq!(
            result.diagnostics,
            vec![EntryDiagnostic {
                entry: "a.json".to_string(),
                record: DiffRecord::Changed("x".to_string()),
            }]
        );
    }

    #[test]
    fn test_membership_changes() {
        let a = archive(&[("keep", "1"), ("gone", "2")]);
        let b = archive(&[("keep", "1"), ("new", "3")]);
        let result = raw().compare(&a, &b);
        assert_eq!(
            result.membership,
            vec![
                MembershipChange::EntryAdded("new".to_string()),
                MembershipChange::EntryRemoved("gone".to_string()),
            ]
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_binary_mismatch_is_fault() {
        let a = archive(&[("logo.png", "\u{1}binary")]);
        let b = archive(&[("logo.png", "\u{2}binary")]);
        let result = raw().compare(&a, &b);
        assert_eq!(result.fault.as_ref().map(|f| f.entry.as_str()), Some("logo.png"));
        assert!(!result.is_identical());
    }

    #[test]
    fn test_whitespace_only_mismatch_under_raw_has_no_diagnostics() {
        let a = archive(&[("a.json", r#"{"x":1}"#)]);
        let b = archive(&[("a.json", r#"{ "x": 1 }"#)]);
        let result = raw().compare(&a, &b);
        assert!(!result.short_circuited);
        assert!(result.is_identical());
    }
}
