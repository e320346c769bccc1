use crate::document::{PackageDocument, ENTROPY_DIR};
use crate::errors::Result;
use crate::source_tree::{load_tree, save_tree};
use packcheck_core::archive::{read_archive, write_archive};
use packcheck_core::capabilities::{DocumentModel, LoadWarning, Loaded};
use packcheck_core::{log_op_end, log_op_error, log_op_start};
use std::path::Path;
use std::time::Instant;

/// File-backed [`DocumentModel`] for [`PackageDocument`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageModel;

fn report_warnings(source: &Path, warnings: &[LoadWarning]) {
    for warning in warnings {
        tracing::warn!(
            archive = %source.display(),
            entry = %warning.entry,
            kind = ?warning.kind,
            "{}",
            warning.message
        );
    }
}

impl DocumentModel for PackageModel {
    type Document = PackageDocument;

    fn load_from_archive(&self, path: &Path) -> Result<Loaded<PackageDocument>> {
        log_op_start!("load_from_archive", archive = %path.display());
        let start = Instant::now();

        let loaded =
            read_archive(path).and_then(|archive| PackageDocument::from_archive(&archive, path));
        match loaded {
            Ok(loaded) => {
                report_warnings(path, &loaded.warnings);
                log_op_end!(
                    "load_from_archive",
                    duration_ms = start.elapsed().as_millis() as u64,
                    entry_count = loaded.document.entries().len(),
                    warning_count = loaded.warnings.len()
                );
                Ok(loaded)
            }
            Err(e) => {
                log_op_error!(
                    "load_from_archive",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e)
            }
        }
    }

    fn load_from_editable_tree(&self, dir: &Path) -> Result<Loaded<PackageDocument>> {
        log_op_start!("load_from_editable_tree", archive = %dir.display());
        let start = Instant::now();

        let loaded = load_tree(dir).map_err(|e| {
            log_op_error!(
                "load_from_editable_tree",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;
        report_warnings(dir, &loaded.warnings);
        log_op_end!(
            "load_from_editable_tree",
            duration_ms = start.elapsed().as_millis() as u64,
            entry_count = loaded.document.entries().len()
        );
        Ok(loaded)
    }

    fn save_to_archive(&self, document: &PackageDocument, path: &Path) -> Result<()> {
        log_op_start!("save_to_archive", archive = %path.display());
        let start = Instant::now();

        document
            .to_archive()
            .and_then(|archive| write_archive(&archive, path))
            .map_err(|e| {
                log_op_error!(
                    "save_to_archive",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        log_op_end!(
            "save_to_archive",
            duration_ms = start.elapsed().as_millis() as u64
        );
        Ok(())
    }

    fn save_to_editable_tree(&self, document: &PackageDocument, dir: &Path) -> Result<()> {
        log_op_start!("save_to_editable_tree", archive = %dir.display());
        let start = Instant::now();

        save_tree(document, dir).map_err(|e| {
            log_op_error!(
                "save_to_editable_tree",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "save_to_editable_tree",
            duration_ms = start.elapsed().as_millis() as u64
        );
        Ok(())
    }

    fn clone_document(&self, document: &PackageDocument) -> PackageDocument {
        document.clone()
    }

    fn entropy_dir_name(&self) -> &str {
        ENTROPY_DIR
    }
}
