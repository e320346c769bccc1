use crate::archive::Archive;
use crate::checksum::hasher::ContentHasher;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Version tag prefixed to every whole-archive hash.
///
/// Bumped whenever the listing format or a normalization rule changes so
/// stale stored checksums are never compared against new ones.
pub const CHECKSUM_VERSION_PREFIX: &str = "C1_";

/// Hash of one entry under a strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryHash {
    pub name: String,
    pub hash: String,
}

/// Single hash summarizing an archive.
///
/// Equality is conclusive; inequality is not (a different strategy may still
/// consider the archives equivalent).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WholeArchiveHash(String);

impl WholeArchiveHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WholeArchiveHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash every comparable entry, keyed by name.
///
/// Entries the strategy skips are absent from the map.
pub fn per_entry_hashes(archive: &Archive, hasher: &ContentHasher) -> BTreeMap<String, String> {
    archive
        .sorted_entries()
        .filter_map(|entry| {
            hasher
                .hash(entry.name(), entry.data())
                .map(|hash| (entry.name().to_string(), hash))
        })
        .collect()
}

/// Per-entry hashes as name-ordered records
pub fn entry_hashes(archive: &Archive, hasher: &ContentHasher) -> Vec<EntryHash> {
    per_entry_hashes(archive, hasher)
        .into_iter()
        .map(|(name, hash)| EntryHash { name, hash })
        .collect()
}

/// Compute the whole-archive hash.
///
/// Hashes the listing `name NUL hash LF` for every comparable entry in name
/// order, so physical storage order never matters.
pub fn whole_archive_hash(archive: &Archive, hasher: &ContentHasher) -> WholeArchiveHash {
    let listing = per_entry_hashes(archive, hasher);
    let mut digest = Sha256::new();
    for (name, hash) in &listing {
        digest.update(name.as_bytes());
        digest.update([0_u8]);
        digest.update(hash.as_bytes());
        digest.update([b'\n']);
    }
    WholeArchiveHash(format!(
        "{}{}",
        CHECKSUM_VERSION_PREFIX,
        hex::encode(digest.finalize())
    ))
}
