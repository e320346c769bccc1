//! Typed delta between two package documents.

use crate::document::PackageDocument;
use crate::header::HEADER_ENTRY;
use packcheck_core::capabilities::{DeltaEngine, TypedDelta};
use packcheck_core::checksum::{ContentHasher, HashStrategy};
use std::collections::BTreeSet;

/// Entry-level delta engine.
///
/// Entries are compared under the normalized hashing strategy, so a
/// cosmetic re-serialization is not a change. Entropy is never compared.
/// Every delta starts with a [`TypedDelta::BaselineTheme`] marker.
#[derive(Debug, Clone)]
pub struct PackageDeltaEngine {
    hasher: ContentHasher,
}

impl Default for PackageDeltaEngine {
    fn default() -> Self {
        Self {
            hasher: ContentHasher::new(HashStrategy::Normalized)
                .with_skip_entries(Vec::<String>::new()),
        }
    }
}

impl PackageDeltaEngine {
    fn same(&self, name: &str, a: &[u8], b: &[u8]) -> bool {
        a == b || self.hasher.hash(name, a) == self.hasher.hash(name, b)
    }
}

impl DeltaEngine for PackageDeltaEngine {
    type Document = PackageDocument;

    fn compute_delta(&self, a: &PackageDocument, b: &PackageDocument) -> Vec<TypedDelta> {
        let mut deltas = vec![TypedDelta::BaselineTheme];

        if a.header() != b.header() {
            deltas.push(TypedDelta::EntryChanged {
                entry: HEADER_ENTRY.to_string(),
            });
        }

        let names: BTreeSet<&str> = a
            .entries()
            .keys()
            .chain(b.entries().keys())
            .map(String::as_str)
            .collect();
        for name in names {
            let delta = match (a.entry(name), b.entry(name)) {
                (Some(left), Some(right)) if self.same(name, left, right) => continue,
                (Some(_), Some(_)) => TypedDelta::EntryChanged {
                    entry: name.to_string(),
                },
                (Some(_), None) => TypedDelta::EntryRemoved {
                    entry: name.to_string(),
                },
                (None, Some(_)) => TypedDelta::EntryAdded {
                    entry: name.to_string(),
                },
                (None, None) => continue,
            };
            deltas.push(delta);
        }
        deltas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;
    use packcheck_core::capabilities::without_baseline_theme;

    fn doc(entries: &[(&str, &str)]) -> PackageDocument {
        let mut doc = PackageDocument::new(Header::new("1.0"));
        for (name, data) in entries {
            doc.set_entry(*name, data.as_bytes().to_vec());
        }
        doc
    }

    #[test]
    fn test_self_delta_is_only_baseline_theme() {
        let d = doc(&[("a.json", "{}")]);
        let deltas = PackageDeltaEngine::default().compute_delta(&d, &d);
        assert_eq!(deltas, vec![TypedDelta::BaselineTheme]);
    }

    #[test]
    fn test_entry_changes_are_classified() {
        let a = doc(&[("keep.json", r#"{"a":1}"#), ("gone.json", "{}"), ("edit.json", "1")]);
        let b = doc(&[("keep.json", r#"{ "a": 1 }"#), ("new.json", "{}"), ("edit.json", "2")]);
        let deltas = without_baseline_theme(PackageDeltaEngine::default().compute_delta(&a, &b));
        assert_eq!(
            deltas,
            vec![
                TypedDelta::EntryChanged {
                    entry: "edit.json".to_string()
                },
                TypedDelta::EntryRemoved {
                    entry: "gone.json".to_string()
                },
                TypedDelta::EntryAdded {
                    entry: "new.json".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_entropy_is_not_a_change() {
        let a = doc(&[("a.json", "{}")]);
        let mut b = a.clone();
        b.entropy_mut().entry_order = vec!["a.json".to_string()];
        let deltas = without_baseline_theme(PackageDeltaEngine::default().compute_delta(&a, &b));
        assert!(deltas.is_empty());
    }

    #[test]
    fn test_header_change() {
        let a = doc(&[]);
        let mut b = a.clone();
        b.header_mut().doc_version = "1.1".to_string();
        let deltas = without_baseline_theme(PackageDeltaEngine::default().compute_delta(&a, &b));
        assert_eq!(
            deltas,
            vec![TypedDelta::EntryChanged {
                entry: HEADER_ENTRY.to_string()
            }]
        );
    }
}
