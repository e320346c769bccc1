//! Entry-level three-way merge.

use crate::document::PackageDocument;
use crate::errors::Result;
use crate::header::HEADER_ENTRY;
use packcheck_core::capabilities::MergeEngine;
use std::collections::BTreeSet;

/// Three-way merge over whole entries.
///
/// A side that left an entry as it was in `base` yields to the other side.
/// When both sides changed an entry differently, `ours` is kept and the
/// conflict is logged. Entropy always comes from `ours`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageMergeEngine;

fn pick<'a, T: PartialEq + ?Sized>(
    name: &str,
    base: Option<&'a T>,
    ours: Option<&'a T>,
    theirs: Option<&'a T>,
) -> Option<&'a T> {
    if ours == theirs || theirs == base {
        ours
    } else if ours == base {
        theirs
    } else {
        tracing::warn!(entry = name, "merge conflict, keeping ours");
        ours
    }
}

impl MergeEngine for PackageMergeEngine {
    type Document = PackageDocument;

    fn merge(
        &self,
        base: &PackageDocument,
        ours: &PackageDocument,
        theirs: &PackageDocument,
    ) -> Result<PackageDocument> {
        let header = pick(
            HEADER_ENTRY,
            Some(base.header()),
            Some(ours.header()),
            Some(theirs.header()),
        )
        .unwrap_or(ours.header())
        .clone();

        let mut merged = PackageDocument::new(header);
        *merged.entropy_mut() = ours.entropy().clone();

        let names: BTreeSet<&str> = base
            .entries()
            .keys()
            .chain(ours.entries().keys())
            .chain(theirs.entries().keys())
            .map(String::as_str)
            .collect();
        for name in names {
            if let Some(data) = pick(name, base.entry(name), ours.entry(name), theirs.entry(name)) {
                merged.set_entry(name, data.to_vec());
            }
        }
        Ok(merged)
    }
}
