//! Content hashing for archive entries and whole archives.
//!
//! ## Hash Types
//!
//! - **Entry hash**: SHA256 of one entry's bytes after the strategy's
//!   normalization; absent when the strategy skips the entry
//! - **Whole-archive hash**: SHA256 over the name-sorted entry hash listing,
//!   prefixed with a format version tag
//!
//! ## Determinism Guarantees
//!
//! - Same content → same hash under the same strategy
//! - Physical entry order never affects the whole-archive hash

pub mod archive_checksum;
pub mod hasher;

pub use archive_checksum::{
    entry_hashes, per_entry_hashes, whole_archive_hash, EntryHash, WholeArchiveHash,
};
pub use hasher::{sha256_hex, ContentHasher, HashStrategy, CHECKSUM_ENTRY};
