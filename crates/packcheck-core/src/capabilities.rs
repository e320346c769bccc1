//! Capability traits for the document collaborators
//!
//! The comparator only ever sees archives. Loading, saving, delta computation
//! and merging belong to a concrete document model which is injected into the
//! stress harness through these traits.

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Category of a non-fatal load finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadWarningKind {
    /// Entry hash differs from the one recorded in the stored checksum manifest
    ChecksumMismatch,
    /// Two entry names differ only by letter case
    NameCollision,
}

/// Non-fatal problem found while loading a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadWarning {
    pub kind: LoadWarningKind,
    pub entry: String,
    pub message: String,
}

impl LoadWarning {
    pub fn new(kind: LoadWarningKind, entry: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            entry: entry.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.entry, self.message)
    }
}

/// A loaded document together with the warnings collected on the way
#[derive(Debug, Clone)]
pub struct Loaded<D> {
    pub document: D,
    pub warnings: Vec<LoadWarning>,
}

impl<D> Loaded<D> {
    pub fn clean(document: D) -> Self {
        Self {
            document,
            warnings: Vec::new(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Load/save engine of a document format.
///
/// Faults (unreadable archive, unsupported format version) are returned as
/// errors. Recoverable findings travel as [`LoadWarning`]s in [`Loaded`].
pub trait DocumentModel {
    type Document;

    /// Load a packed archive.
    ///
    /// # Errors
    ///
    /// Returns an error when the file is not an archive of this format or its
    /// format version is unsupported.
    fn load_from_archive(&self, path: &Path) -> Result<Loaded<Self::Document>>;

    /// Load an unpacked editable source tree.
    ///
    /// # Errors
    ///
    /// Returns an error when the tree cannot be read or is not a document.
    fn load_from_editable_tree(&self, dir: &Path) -> Result<Loaded<Self::Document>>;

    /// Pack a document into an archive file.
    ///
    /// # Errors
    ///
    /// Returns an error when the archive cannot be written.
    fn save_to_archive(&self, document: &Self::Document, path: &Path) -> Result<()>;

    /// Unpack a document into an editable source tree.
    ///
    /// # Errors
    ///
    /// Returns an error when the tree cannot be written.
    fn save_to_editable_tree(&self, document: &Self::Document, dir: &Path) -> Result<()>;

    /// Deep copy through the model's own clone path
    fn clone_document(&self, document: &Self::Document) -> Self::Document;

    /// Name of the editable-tree subdirectory holding volatile state
    fn entropy_dir_name(&self) -> &str;
}

/// One typed difference between two documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypedDelta {
    /// Theme baseline marker, always present and never a real change
    BaselineTheme,
    EntryAdded { entry: String },
    EntryRemoved { entry: String },
    EntryChanged { entry: String },
}

impl TypedDelta {
    pub fn is_baseline_theme(&self) -> bool {
        matches!(self, TypedDelta::BaselineTheme)
    }
}

/// Drop baseline-theme markers, keeping real changes in order
pub fn without_baseline_theme(deltas: Vec<TypedDelta>) -> Vec<TypedDelta> {
    deltas.into_iter().filter(|d| !d.is_baseline_theme()).collect()
}

/// Per-model delta engine
pub trait DeltaEngine {
    type Document;

    fn compute_delta(&self, a: &Self::Document, b: &Self::Document) -> Vec<TypedDelta>;
}

/// Three-way merge engine
pub trait MergeEngine {
    type Document;

    /// Merge `ours` and `theirs` relative to their common ancestor `base`.
    ///
    /// # Errors
    ///
    /// Returns an error when the merge cannot produce a document.
    fn merge(
        &self,
        base: &Self::Document,
        ours: &Self::Document,
        theirs: &Self::Document,
    ) -> Result<Self::Document>;
}
