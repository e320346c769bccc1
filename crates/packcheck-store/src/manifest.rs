//! Stored checksum manifest (`checksum.json`).
//!
//! Written on every archive save and verified on load. A mismatch means the
//! archive was edited by something that did not restamp it; the load goes on
//! and the mismatch is reported as a warning.

use crate::errors::Result;
use packcheck_core::archive::Archive;
use packcheck_core::capabilities::{LoadWarning, LoadWarningKind};
use packcheck_core::checksum::{
    per_entry_hashes, whole_archive_hash, ContentHasher, HashStrategy, CHECKSUM_ENTRY,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChecksumManifest {
    pub client_stamped_checksum: String,
    #[serde(default)]
    pub client_per_file_checksums: BTreeMap<String, String>,
}

fn manifest_hasher() -> ContentHasher {
    ContentHasher::new(HashStrategy::Normalized)
}

impl ChecksumManifest {
    /// Stamp every entry of `archive` except the manifest itself
    pub fn stamp(archive: &Archive) -> Self {
        let hasher = manifest_hasher();
        Self {
            client_stamped_checksum: whole_archive_hash(archive, &hasher).to_string(),
            client_per_file_checksums: per_entry_hashes(archive, &hasher),
        }
    }

    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Compare the stored hashes against the entries actually present.
    ///
    /// Returns one warning per entry whose hash differs, is missing from the
    /// archive, or was never stamped.
    pub fn verify(&self, archive: &Archive) -> Vec<LoadWarning> {
        let actual = per_entry_hashes(archive, &manifest_hasher());
        let mut warnings = Vec::new();

        for (name, stored) in &self.client_per_file_checksums {
            match actual.get(name) {
                Some(hash) if hash == stored => {}
                Some(_) => warnings.push(LoadWarning::new(
                    LoadWarningKind::ChecksumMismatch,
                    name,
                    "content differs from stored checksum",
                )),
                None => warnings.push(LoadWarning::new(
                    LoadWarningKind::ChecksumMismatch,
                    name,
                    "entry listed in checksum manifest is missing",
                )),
            }
        }
        for name in actual.keys() {
            if !self.client_per_file_checksums.contains_key(name) {
                warnings.push(LoadWarning::new(
                    LoadWarningKind::ChecksumMismatch,
                    name,
                    "entry has no stored checksum",
                ));
            }
        }
        warnings
    }
}

/// Read and verify the manifest stored in `archive`, if any.
///
/// An unreadable manifest is itself reported as a warning.
pub fn verify_stored(archive: &Archive) -> Vec<LoadWarning> {
    let Some(bytes) = archive.get(CHECKSUM_ENTRY) else {
        return Vec::new();
    };
    match serde_json::from_slice::<ChecksumManifest>(bytes) {
        Ok(manifest) => manifest.verify(archive),
        Err(e) => vec![LoadWarning::new(
            LoadWarningKind::ChecksumMismatch,
            CHECKSUM_ENTRY,
            format!("unreadable checksum manifest: {e}"),
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(entries: &[(&str, &str)]) -> Archive {
        Archive::from_entries(entries.iter().map(|(n, d)| (*n, d.as_bytes().to_vec()))).unwrap()
    }

    #[test]
    fn test_stamp_then_verify_is_clean() {
        let mut pkg = archive(&[("Header.json", r#"{"DocVersion":"1.0"}"#), ("a.json", "{}")]);
        let manifest = ChecksumManifest::stamp(&pkg);
        pkg.insert(CHECKSUM_ENTRY, manifest.to_bytes().unwrap())
            .unwrap();

        assert!(verify_stored(&pkg).is_empty());
        assert!(manifest.client_stamped_checksum.starts_with("C1_"));
    }

    #[test]
    fn test_edited_entry_warns() {
        let pkg = archive(&[("a.json", r#"{"v":1}"#)]);
        let manifest = ChecksumManifest::stamp(&pkg);
        let edited = archive(&[("a.json", r#"{"v":2}"#), ("b.json", "{}")]);

        let warnings = manifest.verify(&edited);
        let entries: Vec<&str> = warnings.iter().map(|w| w.entry.as_str()).collect();
        assert_eq!(entries, vec!["a.json", "b.json"]);
        assert!(warnings
            .iter()
            .all(|w| w.kind == LoadWarningKind::ChecksumMismatch));
    }

    #[test]
    fn test_garbage_manifest_warns() {
        let pkg = archive(&[(CHECKSUM_ENTRY, "nope")]);
        assert_eq!(verify_stored(&pkg).len(), 1);
    }

    #[test]
    fn test_no_manifest_no_warnings() {
        assert!(verify_stored(&archive(&[("a.json", "{}")])).is_empty());
    }
}
