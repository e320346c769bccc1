//! Package header: format version and document-wide properties.

use crate::errors::{invalid_entry, unsupported_version, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Archive entry holding the header
pub const HEADER_ENTRY: &str = "Header.json";

/// Oldest document format version this store can load
pub const MIN_DOC_VERSION: &str = "1.0";

/// Header fields rewritten on every save; they travel as entropy
pub const VOLATILE_HEADER_FIELDS: &[&str] = &["LastSavedDateTimeUTC", "AnalysisLoadTime"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Header {
    pub doc_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Header {
    pub fn new(doc_version: impl Into<String>) -> Self {
        Self {
            doc_version: doc_version.into(),
            min_version: None,
            properties: Map::new(),
        }
    }

    /// Parse a header payload and reject versions older than [`MIN_DOC_VERSION`].
    ///
    /// # Errors
    ///
    /// - `InvalidStructuredText` if the payload is not a header object
    /// - `UnsupportedFormat` if the version is unparseable or too old
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let header: Header =
            serde_json::from_slice(text).map_err(|e| invalid_entry(HEADER_ENTRY, e))?;
        header.check_version()?;
        Ok(header)
    }

    fn check_version(&self) -> Result<()> {
        let found = parse_version(&self.doc_version)
            .ok_or_else(|| unsupported_version(&self.doc_version, MIN_DOC_VERSION))?;
        let minimum = parse_version(MIN_DOC_VERSION)
            .ok_or_else(|| unsupported_version(MIN_DOC_VERSION, MIN_DOC_VERSION))?;
        if found < minimum {
            return Err(unsupported_version(&self.doc_version, MIN_DOC_VERSION));
        }
        Ok(())
    }

    /// Move volatile fields out of the header
    pub fn take_volatile(&mut self) -> Map<String, Value> {
        VOLATILE_HEADER_FIELDS
            .iter()
            .filter_map(|field| {
                self.properties
                    .remove(*field)
                    .map(|value| (field.to_string(), value))
            })
            .collect()
    }

    /// Serialize with `volatile` merged back in
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a property value cannot be encoded.
    pub fn to_bytes_with(&self, volatile: &Map<String, Value>) -> Result<Vec<u8>> {
        let mut full = self.clone();
        for (key, value) in volatile {
            full.properties.insert(key.clone(), value.clone());
        }
        Ok(serde_json::to_vec(&full)?)
    }
}

/// `major.minor[.patch]` as a comparable tuple
fn parse_version(text: &str) -> Option<(u32, u32, u32)> {
    let mut parts = text.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().map_or(Some(0), |p| p.parse().ok())?;
    let patch = parts.next().map_or(Some(0), |p| p.parse().ok())?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}
