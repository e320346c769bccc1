use packcheck_core::capabilities::{DocumentModel, Loaded};
use packcheck_core::errors::Result;
use packcheck_harness::{HarnessOptions, RoundTripStressHarness};
use packcheck_store::document::ENTROPY_DIR;
use packcheck_store::{
    Header, PackageDeltaEngine, PackageDocument, PackageMergeEngine, PackageModel,
};
use serde_json::Value;
use std::path::Path;

pub type StoreHarness =
    RoundTripStressHarness<PackageModel, PackageDeltaEngine, PackageMergeEngine>;

#[allow(dead_code)]
pub fn store_harness(options: HarnessOptions) -> StoreHarness {
    RoundTripStressHarness::new(
        PackageModel,
        PackageDeltaEngine::default(),
        PackageMergeEngine,
        options,
    )
}

#[allow(dead_code)]
pub fn sample_document() -> PackageDocument {
    let mut doc = PackageDocument::new(Header::new("1.4"));
    doc.set_entry(
        "Src/Screen1.json",
        br#"{"name":"Screen1","items":[{"id":1},{"id":2}]}"#.to_vec(),
    );
    doc.set_entry("Assets/logo.png", vec![0x89, b'P', b'N', b'G']);
    let entropy = doc.entropy_mut();
    entropy.entry_order = vec!["Src/Screen1.json".to_string(), "Header.json".to_string()];
    entropy
        .volatile_header
        .insert("LastSavedDateTimeUTC".to_string(), Value::from("t0"));
    doc
}

/// Write `document` as an archive at `<dir>/<name>`
#[allow(dead_code)]
pub fn saved(dir: &Path, name: &str, document: &PackageDocument) -> std::path::PathBuf {
    let path = dir.join(name);
    PackageModel.save_to_archive(document, &path).expect("save");
    path
}

/// Model whose clone path restamps entropy, so only non-strict clone
/// comparison can pass
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RestampingModel;

impl DocumentModel for RestampingModel {
    type Document = PackageDocument;

    fn load_from_archive(&self, path: &Path) -> Result<Loaded<PackageDocument>> {
        PackageModel.load_from_archive(path)
    }

    fn load_from_editable_tree(&self, dir: &Path) -> Result<Loaded<PackageDocument>> {
        PackageModel.load_from_editable_tree(dir)
    }

    fn save_to_archive(&self, document: &PackageDocument, path: &Path) -> Result<()> {
        PackageModel.save_to_archive(document, path)
    }

    fn save_to_editable_tree(&self, document: &PackageDocument, dir: &Path) -> Result<()> {
        PackageModel.save_to_editable_tree(document, dir)
    }

    fn clone_document(&self, document: &PackageDocument) -> PackageDocument {
        let mut clone = document.clone();
        clone
            .entropy_mut()
            .volatile_header
            .insert("LastSavedDateTimeUTC".to_string(), Value::from("restamped"));
        clone
    }

    fn entropy_dir_name(&self) -> &str {
        ENTROPY_DIR
    }
}

/// Model whose clone path panics
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingCloneModel;

impl DocumentModel for PanickingCloneModel {
    type Document = PackageDocument;

    fn load_from_archive(&self, path: &Path) -> Result<Loaded<PackageDocument>> {
        PackageModel.load_from_archive(path)
    }

    fn load_from_editable_tree(&self, dir: &Path) -> Result<Loaded<PackageDocument>> {
        PackageModel.load_from_editable_tree(dir)
    }

    fn save_to_archive(&self, document: &PackageDocument, path: &Path) -> Result<()> {
        PackageModel.save_to_archive(document, path)
    }

    fn save_to_editable_tree(&self, document: &PackageDocument, dir: &Path) -> Result<()> {
        PackageModel.save_to_editable_tree(document, dir)
    }

    fn clone_document(&self, _document: &PackageDocument) -> PackageDocument {
        panic!("clone not supported")
    }

    fn entropy_dir_name(&self) -> &str {
        ENTROPY_DIR
    }
}
