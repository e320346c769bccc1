use packcheck_core::archive::{write_archive, Archive};
use std::path::{Path, PathBuf};

/// Build an archive from `(name, text)` pairs in the given physical order
#[allow(dead_code)]
pub fn archive_of(entries: &[(&str, &str)]) -> Archive {
    Archive::from_entries(entries.iter().map(|(n, d)| (*n, d.as_bytes().to_vec())))
        .expect("test archive names are unique")
}

/// Write `archive` as `<dir>/<file_name>` and return the path
#[allow(dead_code)]
pub fn write_to(dir: &Path, file_name: &str, archive: &Archive) -> PathBuf {
    let path = dir.join(file_name);
    write_archive(archive, &path).expect("write test archive");
    path
}

/// A small package resembling a real document: header, two screens, an
/// asset and a stored checksum manifest
#[allow(dead_code)]
pub fn sample_package() -> Archive {
    archive_of(&[
        ("Header.json", r#"{"DocVersion":"1.4","MinVersion":"1.0"}"#),
        (
            "Src/Screen1.json",
            r#"{"name":"Screen1","items":[{"id":1,"text":"a"},{"id":2,"text":"b"}],"tags":["x","y"]}"#,
        ),
        ("Src/Screen2.json", r#"{"name":"Screen2","items":[]}"#),
        ("Assets/logo.png", "\u{89}PNG\u{1}\u{2}"),
        ("checksum.json", r#"{"ClientStampedChecksum":"C1_deadbeef"}"#),
    ])
}
