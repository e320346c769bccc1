use crate::diff::model::DiffRecord;
use crate::flatten::FlattenedPayload;

/// Compare two flattened payloads.
///
/// Every path of `a` is visited in order and reported `Changed` when `b` holds
/// different raw text, `Removed` when `b` lacks it. Paths only in `b` follow
/// as `Added`.
pub fn semantic_diff(a: &FlattenedPayload, b: &FlattenedPayload) -> Vec<DiffRecord> {
    let mut records = Vec::new();

    for (path, a_text) in a.iter() {
        match b.get(path) {
            Some(b_text) if b_text != a_text => records.push(DiffRecord::Changed(path.to_string())),
            Some(_) => {}
            None => records.push(DiffRecord::Removed(path.to_string())),
        }
    }

    records.extend(
        b.paths()
            .filter(|path| !a.contains(path))
            .map(|path| DiffRecord::Added(path.to_string())),
    );

    records
}
