//! packcheck core - structural comparison and diff engine
//!
//! This crate provides the pieces needed to decide whether two document
//! packages are the same and, when they are not, to explain why:
//! - Archive model and deterministic zip I/O
//! - Per-entry and whole-archive content hashing under a normalization strategy
//! - Flattening of structured-text payloads into leaf paths
//! - Added / removed / changed classification of leaf differences
//! - The two-pass archive comparator
//! - Capability traits for the document model, delta and merge engines

pub mod archive;
pub mod atomic;
pub mod capabilities;
pub mod checksum;
pub mod compare;
pub mod diff;
pub mod errors;
pub mod flatten;
pub mod logging_facility;

// Re-exported for the logging macros
pub use packcheck_core_types;

// Re-export commonly used types
pub use archive::{read_archive, write_archive, Archive, ArchiveEntry};
pub use capabilities::{
    DeltaEngine, DocumentModel, LoadWarning, LoadWarningKind, Loaded, MergeEngine, TypedDelta,
};
pub use checksum::{ContentHasher, HashStrategy, WholeArchiveHash};
pub use compare::{compare_archives, ArchiveComparator, CompareOptions, ComparisonResult};
pub use diff::{semantic_diff, DiffRecord, EntryDiagnostic};
pub use errors::{ExError, ExErrorKind, PackcheckError, Result};
pub use flatten::{flatten, FlattenedPayload};
