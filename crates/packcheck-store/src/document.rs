//! In-memory package document.

use crate::errors::{load_fault, Result};
use crate::header::{Header, HEADER_ENTRY};
use crate::manifest::{verify_stored, ChecksumManifest};
use packcheck_core::archive::Archive;
use packcheck_core::capabilities::{LoadWarning, LoadWarningKind, Loaded};
use packcheck_core::checksum::CHECKSUM_ENTRY;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Editable-tree directory holding [`Entropy`]
pub const ENTROPY_DIR: &str = "Entropy";

/// File inside [`ENTROPY_DIR`] that stores the entropy record
pub const ENTROPY_FILE: &str = "Entropy.json";

/// State that legitimately changes between saves without changing the
/// document: physical entry order and volatile header stamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Entropy {
    #[serde(default)]
    pub entry_order: Vec<String>,
    #[serde(default)]
    pub volatile_header: Map<String, Value>,
}

impl Entropy {
    pub fn is_empty(&self) -> bool {
        self.entry_order.is_empty() && self.volatile_header.is_empty()
    }
}

/// A loaded document package.
///
/// Entries are keyed by name; the header is held parsed and the checksum
/// manifest is never stored, it is restamped on every archive save.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDocument {
    header: Header,
    entries: BTreeMap<String, Vec<u8>>,
    entropy: Entropy,
}

impl PackageDocument {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            entries: BTreeMap::new(),
            entropy: Entropy::default(),
        }
    }

    pub(crate) fn from_parts(
        header: Header,
        entries: BTreeMap<String, Vec<u8>>,
        entropy: Entropy,
    ) -> Self {
        Self {
            header,
            entries,
            entropy,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn entries(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn set_entry(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.entries.insert(name.into(), data.into());
    }

    pub fn remove_entry(&mut self, name: &str) -> Option<Vec<u8>> {
        self.entries.remove(name)
    }

    pub fn entropy(&self) -> &Entropy {
        &self.entropy
    }

    pub fn entropy_mut(&mut self) -> &mut Entropy {
        &mut self.entropy
    }

    /// Same document with entropy reset to defaults
    pub fn without_entropy(&self) -> Self {
        Self {
            entropy: Entropy::default(),
            ..self.clone()
        }
    }

    /// Build a document from a decoded archive.
    ///
    /// # Errors
    ///
    /// - `LoadFailed` if the archive has no header entry
    /// - `UnsupportedFormat` if the header version is too old
    pub fn from_archive(archive: &Archive, source: &Path) -> Result<Loaded<Self>> {
        let header_bytes = archive
            .get(HEADER_ENTRY)
            .ok_or_else(|| load_fault(source, format!("missing {HEADER_ENTRY}")))?;
        let mut header =
            Header::parse(header_bytes).map_err(|e| e.with_archive(source.display().to_string()))?;

        let mut warnings = verify_stored(archive);
        warnings.extend(name_collisions(archive.names()));

        let entropy = Entropy {
            entry_order: archive
                .entries()
                .iter()
                .map(|e| e.name().to_string())
                .filter(|name| name != CHECKSUM_ENTRY)
                .collect(),
            volatile_header: header.take_volatile(),
        };
        let entries = archive
            .sorted_entries()
            .filter(|e| e.name() != HEADER_ENTRY && e.name() != CHECKSUM_ENTRY)
            .map(|e| (e.name().to_string(), e.data().to_vec()))
            .collect();

        Ok(Loaded {
            document: Self::from_parts(header, entries, entropy),
            warnings,
        })
    }

    /// Pack into an archive with a freshly stamped checksum manifest.
    ///
    /// Entries follow the recorded physical order; entries the order does
    /// not know about follow in name order. The manifest is always last.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the header cannot be encoded.
    pub fn to_archive(&self) -> Result<Archive> {
        let mut content: BTreeMap<&str, Vec<u8>> = self
            .entries
            .iter()
            .map(|(name, data)| (name.as_str(), data.clone()))
            .collect();
        content.insert(
            HEADER_ENTRY,
            self.header.to_bytes_with(&self.entropy.volatile_header)?,
        );

        let mut archive = Archive::new();
        for name in &self.entropy.entry_order {
            if let Some(data) = content.remove(name.as_str()) {
                archive.insert(name.clone(), data)?;
            }
        }
        for (name, data) in content {
            archive.insert(name, data)?;
        }

        let manifest = ChecksumManifest::stamp(&archive);
        archive.insert(CHECKSUM_ENTRY, manifest.to_bytes()?)?;
        Ok(archive)
    }
}

/// Warn once for every name that case-insensitively repeats an earlier one
pub(crate) fn name_collisions<'a>(names: impl Iterator<Item = &'a str>) -> Vec<LoadWarning> {
    let mut first_seen: HashMap<String, &str> = HashMap::new();
    let mut warnings = Vec::new();
    for name in names {
        match first_seen.entry(name.to_lowercase()) {
            Entry::Occupied(original) => warnings.push(LoadWarning::new(
                LoadWarningKind::NameCollision,
                name,
                format!(
                    "name collides with {} on case-insensitive file systems",
                    original.get()
                ),
            )),
            Entry::Vacant(slot) => {
                slot.insert(name);
            }
        }
    }
    warnings
}
