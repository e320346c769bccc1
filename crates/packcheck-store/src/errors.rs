//! Error handling for packcheck-store
//!
//! Wraps packcheck-core ExError with store-specific helpers

pub use packcheck_core::errors::io_error;
use packcheck_core::errors::{ExError, ExErrorKind, PackcheckError};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a load fault for a package that is structurally unusable
pub fn load_fault(source: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::LoadFailed)
        .with_op("load")
        .with_archive(source.display().to_string())
        .with_message(reason)
}

/// Create an unsupported format version error
pub fn unsupported_version(found: &str, minimum: &str) -> ExError {
    ExError::from(PackcheckError::UnsupportedFormatVersion {
        found: found.to_string(),
        minimum: minimum.to_string(),
    })
    .with_op("load_header")
}

/// Create an error for an entry whose structured text cannot be read
pub fn invalid_entry(entry: &str, reason: impl std::fmt::Display) -> ExError {
    ExError::from(PackcheckError::InvalidStructuredText {
        entry: entry.to_string(),
        reason: reason.to_string(),
    })
}

/// Create a save error
pub fn save_error(target: &Path, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::SaveFailed)
        .with_op("save")
        .with_archive(target.display().to_string())
        .with_message(reason)
}
