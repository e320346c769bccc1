//! Mismatch dump for offline inspection.

use crate::atomic::atomic_write;
use crate::checksum::sha256_hex;
use std::path::{Path, PathBuf};

/// Map an entry name to a single flat file name inside the dump directory.
///
/// Names that needed rewriting get a short digest of the original name so
/// `Src/a.json` and `Src_a.json` land in different files.
pub(crate) fn sanitize_entry_name(name: &str) -> String {
    let flat: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if flat == name {
        flat
    } else {
        format!("{flat}~{}", &sha256_hex(name.as_bytes())[..8])
    }
}

fn dump_path(dir: &Path, entry: &str, side: &str) -> PathBuf {
    dir.join(format!("{}.{side}", sanitize_entry_name(entry)))
}

/// Write both payloads of a mismatched entry as `<name>.a` and `<name>.b`.
///
/// Failures are logged and otherwise ignored; the dump never affects the
/// comparison outcome.
pub(crate) fn dump_mismatch(dir: &Path, entry: &str, a: &[u8], b: &[u8]) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        tracing::warn!(entry, dump_dir = %dir.display(), error = %e, "cannot create dump directory");
        return;
    }
    for (side, bytes) in [("a", a), ("b", b)] {
        let path = dump_path(dir, entry, side);
        if let Err(e) = atomic_write(&path, bytes) {
            tracing::warn!(entry, path = %path.display(), error = %e, "mismatch dump failed");
        }
    }
}
