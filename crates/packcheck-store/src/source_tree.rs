//! Editable source tree: one file per entry plus an entropy subtree.
//!
//! ```text
//! <root>/Header.json            header without volatile fields
//! <root>/<entry path>           entry bytes, verbatim
//! <root>/Entropy/Entropy.json   entry order and volatile header fields
//! ```

use crate::document::{name_collisions, Entropy, PackageDocument, ENTROPY_DIR, ENTROPY_FILE};
use crate::errors::{invalid_entry, io_error, load_fault, save_error, Result};
use crate::header::{Header, HEADER_ENTRY};
use packcheck_core::atomic::atomic_write;
use packcheck_core::capabilities::Loaded;
use packcheck_core::errors::{ExError, ExErrorKind, PackcheckError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

fn entropy_entry() -> String {
    format!("{ENTROPY_DIR}/{ENTROPY_FILE}")
}

/// Map an entry name onto a path below `root`, refusing anything that
/// would escape it.
fn entry_path(root: &Path, name: &str) -> Result<PathBuf> {
    let mut path = root.to_path_buf();
    for part in name.split('/') {
        if part.is_empty() || part == "." || part == ".." {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("save_tree")
                .with_entry(name)
                .with_message("entry name cannot be mapped to a file path"));
        }
        path.push(part);
    }
    Ok(path)
}

/// Write `document` as an editable tree under `root`.
///
/// # Errors
///
/// - `SaveFailed` if `root` exists and is not empty
/// - `InvalidInput` if an entry name is not a safe relative path or lives
///   under the entropy directory
/// - `Io` if a file cannot be written
pub fn save_tree(document: &PackageDocument, root: &Path) -> Result<()> {
    if root.exists() {
        let mut listing = fs::read_dir(root).map_err(|e| io_error("read_tree_root", e))?;
        if listing.next().is_some() {
            return Err(save_error(root, "target directory is not empty"));
        }
    }

    let entropy_prefix = format!("{ENTROPY_DIR}/");
    for (name, data) in document.entries() {
        if name.starts_with(&entropy_prefix) || name == HEADER_ENTRY {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("save_tree")
                .with_entry(name.clone())
                .with_message("entry name is reserved in the editable tree"));
        }
        atomic_write(&entry_path(root, name)?, data)?;
    }

    let header = serde_json::to_vec_pretty(document.header())?;
    atomic_write(&root.join(HEADER_ENTRY), &header)?;

    let entropy = serde_json::to_vec_pretty(document.entropy())?;
    atomic_write(&root.join(ENTROPY_DIR).join(ENTROPY_FILE), &entropy)?;

    tracing::debug!(
        root = %root.display(),
        entry_count = document.entries().len(),
        "editable tree written"
    );
    Ok(())
}

/// Load an editable tree written by [`save_tree`] (or edited by hand).
///
/// A missing entropy subtree is not an error: the document then carries
/// default entropy. Volatile fields found in the header file are moved into
/// entropy unless entropy already has them.
///
/// # Errors
///
/// - `NotFound` if `root` does not exist
/// - `LoadFailed` if the header file is missing
/// - `UnsupportedFormat` if the header version is too old
pub fn load_tree(root: &Path) -> Result<Loaded<PackageDocument>> {
    if !root.is_dir() {
        return Err(PackcheckError::ArchiveNotFound {
            path: root.display().to_string(),
        }
        .into());
    }

    let entropy_name = entropy_entry();
    let entropy_prefix = format!("{ENTROPY_DIR}/");
    let mut header_bytes = None;
    let mut entropy = Entropy::default();
    let mut entries = BTreeMap::new();

    for item in WalkDir::new(root).sort_by_file_name() {
        let item = item.map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("walk_tree")
                .with_message(e.to_string())
        })?;
        if !item.file_type().is_file() {
            continue;
        }
        let Some(name) = relative_name(root, item.path()) else {
            continue;
        };
        let data = fs::read(item.path()).map_err(|e| io_error("read_tree_file", e))?;

        if name == entropy_name {
            entropy = serde_json::from_slice(&data).map_err(|e| invalid_entry(&name, e))?;
        } else if name.starts_with(&entropy_prefix) {
            tracing::debug!(entry = %name, "ignoring unknown file in entropy directory");
        } else if name == HEADER_ENTRY {
            header_bytes = Some(data);
        } else {
            entries.insert(name, data);
        }
    }

    let header_bytes =
        header_bytes.ok_or_else(|| load_fault(root, format!("missing {HEADER_ENTRY}")))?;
    let mut header =
        Header::parse(&header_bytes).map_err(|e| e.with_archive(root.display().to_string()))?;
    merge_volatile(&mut entropy.volatile_header, header.take_volatile());

    let warnings = name_collisions(entries.keys().map(String::as_str));
    Ok(Loaded {
        document: PackageDocument::from_parts(header, entries, entropy),
        warnings,
    })
}

fn merge_volatile(target: &mut Map<String, Value>, found: Map<String, Value>) {
    for (key, value) in found {
        target.entry(key).or_insert(value);
    }
}

/// Forward-slash entry name of `path` relative to `root`
fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = rel
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}
