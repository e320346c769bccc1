use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic error
/// handling, test assertions and CLI exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    NotFound,

    // Archive
    InvalidArchive,
    DuplicateEntry,
    UnsupportedFormat,

    // Structured text / comparison
    InvalidStructuredText,
    /// Hash mismatch on an entry that has no finer-grained diff strategy
    StructuralMismatch,

    // Document model
    LoadFailed,
    SaveFailed,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidArchive => "ERR_INVALID_ARCHIVE",
            ExErrorKind::DuplicateEntry => "ERR_DUPLICATE_ENTRY",
            ExErrorKind::UnsupportedFormat => "ERR_UNSUPPORTED_FORMAT",
            ExErrorKind::InvalidStructuredText => "ERR_INVALID_STRUCTURED_TEXT",
            ExErrorKind::StructuralMismatch => "ERR_STRUCTURAL_MISMATCH",
            ExErrorKind::LoadFailed => "ERR_LOAD_FAILED",
            ExErrorKind::SaveFailed => "ERR_SAVE_FAILED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context (operation, archive
/// path, entry name) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    archive: Option<String>,
    entry: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            archive: None,
            entry: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add archive location context
    pub fn with_archive(mut self, archive: impl Into<String>) -> Self {
        self.archive = Some(archive.into());
        self
    }

    /// Add entry name context
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the archive context, if any
    pub fn archive(&self) -> Option<&str> {
        self.archive.as_deref()
    }

    /// Get the entry context, if any
    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(archive) = &self.archive {
            write!(f, " (archive: {})", archive)?;
        }
        if let Some(entry) = &self.entry {
            write!(f, " (entry: {})", entry)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for packcheck operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PackcheckError {
    // ===== Archive Errors =====
    /// Archive file does not exist
    #[error("Archive not found: {path}")]
    ArchiveNotFound { path: String },

    /// Archive container could not be decoded
    #[error("Invalid archive {path}: {reason}")]
    InvalidArchive { path: String, reason: String },

    /// Two entries with the same name in one archive
    #[error("Duplicate entry in archive: {name}")]
    DuplicateEntry { name: String },

    /// Entry lookup failed
    #[error("Entry not found: {name}")]
    EntryNotFound { name: String },

    /// Package format version is older than the supported minimum
    #[error("Unsupported format version {found} (minimum {minimum})")]
    UnsupportedFormatVersion { found: String, minimum: String },

    // ===== Comparison Errors =====
    /// Payload is not valid structured text
    #[error("Entry {entry} is not structured text: {reason}")]
    InvalidStructuredText { entry: String, reason: String },

    /// Hash mismatch on a payload that cannot be diffed structurally
    #[error("Mismatch in non-text entry {entry}")]
    NonTextMismatch { entry: String },

    // ===== Generic Errors =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<PackcheckError> for ExError {
    fn from(err: PackcheckError) -> Self {
        match err {
            PackcheckError::ArchiveNotFound { path } => ExError::new(ExErrorKind::NotFound)
                .with_archive(path)
                .with_message("Archive not found"),

            PackcheckError::InvalidArchive { path, reason } => {
                ExError::new(ExErrorKind::InvalidArchive)
                    .with_archive(path)
                    .with_message(reason)
            }

            PackcheckError::DuplicateEntry { name } => ExError::new(ExErrorKind::DuplicateEntry)
                .with_entry(name)
                .with_message("Entry names must be unique within an archive"),

            PackcheckError::EntryNotFound { name } => ExError::new(ExErrorKind::NotFound)
                .with_entry(name)
                .with_message("Entry not found"),

            PackcheckError::UnsupportedFormatVersion { found, minimum } => {
                ExError::new(ExErrorKind::UnsupportedFormat).with_message(format!(
                    "Format version {} is older than minimum {}",
                    found, minimum
                ))
            }

            PackcheckError::InvalidStructuredText { entry, reason } => {
                ExError::new(ExErrorKind::InvalidStructuredText)
                    .with_entry(entry)
                    .with_message(reason)
            }

            PackcheckError::NonTextMismatch { entry } => {
                ExError::new(ExErrorKind::StructuralMismatch)
                    .with_entry(entry)
                    .with_message("Hash mismatch on entry without structured text")
            }

            PackcheckError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            PackcheckError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to PackcheckError
impl From<serde_json::Error> for PackcheckError {
    fn from(err: serde_json::Error) -> Self {
        PackcheckError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        PackcheckError::from(err).into()
    }
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_error_kind_codes() {
        let cases = [
            (ExErrorKind::InvalidArchive, "ERR_INVALID_ARCHIVE"),
            (ExErrorKind::DuplicateEntry, "ERR_DUPLICATE_ENTRY"),
            (ExErrorKind::UnsupportedFormat, "ERR_UNSUPPORTED_FORMAT"),
            (ExErrorKind::StructuralMismatch, "ERR_STRUCTURAL_MISMATCH"),
            (ExErrorKind::SaveFailed, "ERR_SAVE_FAILED"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_non_text_mismatch_carries_entry() {
        let err: ExError = PackcheckError::NonTextMismatch {
            entry: "Assets/logo.png".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::StructuralMismatch);
        assert_eq!(err.entry(), Some("Assets/logo.png"));
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::InvalidArchive)
            .with_op("read_archive")
            .with_archive("a.pack")
            .with_message("not a zip file");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_INVALID_ARCHIVE]"));
        assert!(rendered.contains("read_archive"));
        assert!(rendered.contains("a.pack"));
    }

    #[test]
    fn test_serde_json_error_maps_to_serialization() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ExError = parse_err.into();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
