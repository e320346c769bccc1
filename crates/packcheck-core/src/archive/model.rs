use crate::errors::{PackcheckError, Result};
use std::collections::BTreeMap;

/// One named payload within an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    name: String,
    data: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.name, self.data)
    }
}

/// Ordered set of uniquely named entries.
///
/// Physical order (insertion order) is preserved for writing; every
/// comparison-facing accessor works in name-sorted order instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
    index: BTreeMap<String, usize>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an archive from `(name, bytes)` pairs, rejecting duplicate names.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEntry` on the first repeated name.
    pub fn from_entries<I, N, D>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<Vec<u8>>,
    {
        let mut archive = Self::new();
        for (name, data) in entries {
            archive.insert(name, data)?;
        }
        Ok(archive)
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEntry` if the name is already present.
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(PackcheckError::DuplicateEntry { name }.into());
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(ArchiveEntry::new(name, data));
        Ok(())
    }

    /// Remove an entry by name, returning its payload.
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        let position = self.index.remove(name)?;
        let entry = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(entry.data)
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.index.get(name).map(|&i| self.entries[i].data())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Entries in physical (insertion) order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Entries sorted by name
    pub fn sorted_entries(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.index.values().map(move |&i| &self.entries[i])
    }

    /// Entry names sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
