//! Comparison output types.

use crate::checksum::WholeArchiveHash;
use crate::diff::EntryDiagnostic;
use crate::errors::{ExError, PackcheckError};
use serde::{Deserialize, Serialize};

/// Archive-membership difference (as opposed to a content difference)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entry", rename_all = "snake_case")]
pub enum MembershipChange {
    /// Entry present only in the candidate archive
    EntryAdded(String),
    /// Entry present only in the reference archive
    EntryRemoved(String),
}

impl MembershipChange {
    pub fn entry(&self) -> &str {
        match self {
            MembershipChange::EntryAdded(e) | MembershipChange::EntryRemoved(e) => e,
        }
    }
}

/// Hash mismatch on an entry where at least one side is not structured text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralFault {
    pub entry: String,
    pub reason: String,
}

impl From<StructuralFault> for ExError {
    fn from(fault: StructuralFault) -> Self {
        ExError::from(PackcheckError::NonTextMismatch { entry: fault.entry })
            .with_op("compare")
            .with_message(fault.reason)
    }
}

/// Outcome of one `compare` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub hash_a: WholeArchiveHash,
    pub hash_b: WholeArchiveHash,
    /// True when equal whole-archive hashes skipped per-entry inspection
    pub short_circuited: bool,
    pub diagnostics: Vec<EntryDiagnostic>,
    pub membership: Vec<MembershipChange>,
    /// First non-text mismatch; comparison stops when it is raised
    pub fault: Option<StructuralFault>,
}

impl ComparisonResult {
    pub(crate) fn identical(hash: WholeArchiveHash) -> Self {
        Self {
            hash_a: hash.clone(),
            hash_b: hash,
            short_circuited: true,
            diagnostics: Vec::new(),
            membership: Vec::new(),
            fault: None,
        }
    }

    pub fn is_identical(&self) -> bool {
        self.fault.is_none() && self.diagnostics.is_empty() && self.membership.is_empty()
    }

    pub fn is_fatal(&self) -> bool {
        self.fault.is_some()
    }

    /// Convert into `Err` when a fault was raised, otherwise return the result
    ///
    /// # Errors
    ///
    /// Returns `StructuralMismatch` carrying the faulting entry name.
    pub fn into_fatal(self) -> Result<Self, ExError> {
        match self.fault {
            Some(fault) => Err(fault.into()),
            None => Ok(self),
        }
    }
}
