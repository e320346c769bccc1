use packcheck_store::{Header, PackageDocument};
use serde_json::Value;

/// A representative document: two screens, an asset and entropy
#[allow(dead_code)]
pub fn sample_document() -> PackageDocument {
    let mut header = Header::new("1.4");
    header.min_version = Some("1.0".to_string());
    header
        .properties
        .insert("Theme".to_string(), Value::from("light"));

    let mut doc = PackageDocument::new(header);
    doc.set_entry(
        "Src/Screen1.json",
        br#"{"name":"Screen1","items":[{"id":1},{"id":2}],"tags":["x","y"]}"#.to_vec(),
    );
    doc.set_entry("Src/Screen2.json", br#"{"name":"Screen2","items":[]}"#.to_vec());
    doc.set_entry("Assets/logo.png", vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a]);

    let entropy = doc.entropy_mut();
    entropy.entry_order = vec![
        "Src/Screen2.json".to_string(),
        "Header.json".to_string(),
        "Src/Screen1.json".to_string(),
        "Assets/logo.png".to_string(),
    ];
    entropy.volatile_header.insert(
        "LastSavedDateTimeUTC".to_string(),
        Value::from("2024-05-01T10:00:00Z"),
    );
    doc
}
