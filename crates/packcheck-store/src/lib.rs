//! packcheck store - concrete document package model
//!
//! Provides:
//! - `PackageDocument` with its header, entries and entropy
//! - Archive load/save with a stamped checksum manifest
//! - Editable source tree load/save
//! - Entry-level delta and three-way merge engines

pub mod delta;
pub mod document;
pub mod errors;
pub mod header;
pub mod manifest;
pub mod merge;
pub mod model;
pub mod source_tree;

// Re-export key types
pub use delta::PackageDeltaEngine;
pub use document::{Entropy, PackageDocument};
pub use errors::Result;
pub use header::Header;
pub use merge::PackageMergeEngine;
pub use model::PackageModel;
