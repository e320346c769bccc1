use crate::checksum::{ContentHasher, HashStrategy, CHECKSUM_ENTRY};
use std::path::PathBuf;

/// Runtime configuration of one comparator
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Normalization applied before hashing entries
    pub strategy: HashStrategy,
    /// Entries (or `dir/` prefixes) never compared
    pub skip_entries: Vec<String>,
    /// Where mismatching payload pairs are written for offline inspection
    pub dump_dir: Option<PathBuf>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            strategy: HashStrategy::Normalized,
            skip_entries: vec![CHECKSUM_ENTRY.to_string()],
            dump_dir: None,
        }
    }
}

impl CompareOptions {
    pub fn with_strategy(mut self, strategy: HashStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Add skip patterns on top of the existing list
    pub fn skipping(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.skip_entries.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dump_dir = Some(dir.into());
        self
    }

    pub(crate) fn hasher(&self) -> ContentHasher {
        ContentHasher::new(self.strategy).with_skip_entries(self.skip_entries.iter().cloned())
    }
}
