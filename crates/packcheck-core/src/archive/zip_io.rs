//! Zip container reading and deterministic writing.

use crate::archive::model::Archive;
use crate::atomic::atomic_write;
use crate::errors::{io_error, ExError, PackcheckError, Result};
use std::fs;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime as ZipDateTime, ZipArchive, ZipWriter};

/// Read an archive file from disk.
///
/// Directory records are skipped; entry names are normalized to forward
/// slashes without a leading `./` or `/`.
///
/// # Errors
///
/// - `NotFound` if the path does not exist
/// - `InvalidArchive` if the container cannot be decoded
/// - `DuplicateEntry` if two records normalize to the same name
pub fn read_archive(path: &Path) -> Result<Archive> {
    if !path.exists() {
        return Err(PackcheckError::ArchiveNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let file = fs::File::open(path).map_err(|e| io_error("open_archive", e))?;
    read_from(file, &path.display().to_string())
}

/// Read an archive from an in-memory zip image.
///
/// # Errors
///
/// Same as [`read_archive`], minus `NotFound`.
pub fn read_archive_bytes(bytes: &[u8]) -> Result<Archive> {
    read_from(Cursor::new(bytes), "<memory>")
}

fn read_from<R: Read + Seek>(reader: R, label: &str) -> Result<Archive> {
    let mut zip = ZipArchive::new(reader).map_err(|e| invalid(label, e))?;

    let mut archive = Archive::new();
    for idx in 0..zip.len() {
        let mut entry = zip.by_index(idx).map_err(|e| invalid(label, e))?;
        if entry.is_dir() || entry.name().ends_with('/') {
            continue;
        }

        let name = normalize_entry_name(entry.name());
        if name.is_empty() {
            continue;
        }

        let mut data = Vec::with_capacity(initial_capacity(entry.size()));
        entry
            .read_to_end(&mut data)
            .map_err(|e| io_error("read_archive_entry", e).with_entry(name.clone()))?;

        archive
            .insert(name, data)
            .map_err(|e| e.with_archive(label.to_string()))?;
    }

    Ok(archive)
}

/// Encode an archive as a zip image.
///
/// Output is deterministic for a given archive: entries are written in
/// physical order with a fixed timestamp and fixed permissions.
///
/// # Errors
///
/// Returns `InvalidArchive` if the zip writer rejects an entry.
pub fn to_zip_bytes(archive: &Archive) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let fixed_time = ZipDateTime::from_date_and_time(1980, 1, 1, 0, 0, 0).map_err(|e| {
        ExError::from(PackcheckError::Internal {
            message: format!("invalid zip timestamp: {e}"),
        })
    })?;
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(fixed_time)
        .unix_permissions(0o644);

    for entry in archive.entries() {
        zip.start_file(entry.name(), options)
            .map_err(|e| invalid("<memory>", e).with_entry(entry.name()))?;
        zip.write_all(entry.data())
            .map_err(|e| io_error("write_archive_entry", e).with_entry(entry.name()))?;
    }

    let cursor = zip.finish().map_err(|e| invalid("<memory>", e))?;
    Ok(cursor.into_inner())
}

/// Write an archive to disk atomically.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn write_archive(archive: &Archive, path: &Path) -> Result<()> {
    let bytes = to_zip_bytes(archive)?;
    atomic_write(path, &bytes).map_err(|e| e.with_archive(path.display().to_string()))
}

/// Upper bound on the buffer reserved up front for one entry
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

// The declared size comes from the container header and is untrusted.
fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOC)).unwrap_or(0)
}

fn normalize_entry_name(name: &str) -> String {
    name.replace('\\', "/")
        .trim_start_matches("./")
        .trim_start_matches('/')
        .to_string()
}

fn invalid(label: &str, err: zip::result::ZipError) -> ExError {
    PackcheckError::InvalidArchive {
        path: label.to_string(),
        reason: err.to_string(),
    }
    .into()
}
