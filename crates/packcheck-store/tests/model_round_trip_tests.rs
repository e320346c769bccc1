#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::sample_document;
use packcheck_core::archive::{read_archive, write_archive, Archive};
use packcheck_core::capabilities::{DocumentModel, LoadWarningKind};
use packcheck_core::compare::{compare_archives, CompareOptions};
use packcheck_core::errors::ExErrorKind;
use packcheck_store::PackageModel;
use tempfile::TempDir;

#[test]
fn test_archive_round_trip_preserves_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.pack");
    let model = PackageModel;
    let doc = sample_document();

    model.save_to_archive(&doc, &path).unwrap();
    let loaded = model.load_from_archive(&path).unwrap();

    assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
    assert_eq!(loaded.document, doc);
}

#[test]
fn test_saving_twice_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.pack");
    let b = dir.path().join("b.pack");
    let model = PackageModel;
    let doc = sample_document();

    model.save_to_archive(&doc, &a).unwrap();
    model.save_to_archive(&doc, &b).unwrap();

    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    assert!(compare_archives(&a, &b, &CompareOptions::default())
        .unwrap()
        .is_identical());
}

#[test]
fn test_editable_tree_round_trip_compares_identical() {
    let dir = TempDir::new().unwrap();
    let tree = dir.path().join("src");
    let a = dir.path().join("a.pack");
    let b = dir.path().join("b.pack");
    let model = PackageModel;
    let doc = sample_document();

    model.save_to_archive(&doc, &a).unwrap();
    model.save_to_editable_tree(&doc, &tree).unwrap();
    let from_tree = model.load_from_editable_tree(&tree).unwrap().document;
    model.save_to_archive(&from_tree, &b).unwrap();

    assert!(compare_archives(&a, &b, &CompareOptions::default())
        .unwrap()
        .is_identical());
}

#[test]
fn test_hand_edited_archive_loads_with_warning() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.pack");
    let model = PackageModel;
    model.save_to_archive(&sample_document(), &path).unwrap();

    let archive = read_archive(&path).unwrap();
    let edited = Archive::from_entries(archive.entries().iter().map(|e| {
        let data = if e.name() == "Src/Screen2.json" {
            br#"{"name":"Renamed","items":[]}"#.to_vec()
        } else {
            e.data().to_vec()
        };
        (e.name().to_string(), data)
    }))
    .unwrap();
    write_archive(&edited, &path).unwrap();

    let loaded = model.load_from_archive(&path).unwrap();
    assert_eq!(loaded.warnings.len(), 1);
    assert_eq!(loaded.warnings[0].kind, LoadWarningKind::ChecksumMismatch);
    assert_eq!(loaded.warnings[0].entry, "Src/Screen2.json");
}

#[test]
fn test_not_a_zip_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.pack");
    std::fs::write(&path, b"plain text").unwrap();

    let err = PackageModel.load_from_archive(&path).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidArchive);
}

#[test]
fn test_too_old_format_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.pack");
    let archive =
        Archive::from_entries([("Header.json", br#"{"DocVersion":"0.3"}"#.to_vec())]).unwrap();
    write_archive(&archive, &path).unwrap();

    let err = PackageModel.load_from_archive(&path).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::UnsupportedFormat);
}

#[test]
fn test_entropy_dir_name() {
    assert_eq!(PackageModel.entropy_dir_name(), "Entropy");
}
