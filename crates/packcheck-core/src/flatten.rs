//! Structured-text flattening.
//!
//! Reduces one JSON payload to a flat map from leaf path to the exact raw
//! text of that leaf. Objects are descended member by member; arrays are only
//! descended when their first element is an object, otherwise the whole array
//! is a single opaque leaf.
//!
//! ```text
//! {"a":1,"items":[{"id":2}],"tags":[1, 2]}
//!
//! a           -> 1
//! items[0].id -> 2
//! tags        -> [1, 2]
//! ```

use crate::checksum::hasher::strip_bom;
use serde_json::value::RawValue;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use thiserror::Error;

/// Why a payload could not be flattened
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("payload is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("payload is not structured text: {0}")]
    Json(#[from] serde_json::Error),
    /// Two members spell the same leaf path, e.g. key `"a.b"` next to `a: {b}`
    #[error("leaf path `{0}` is produced by more than one member")]
    PathCollision(String),
}

/// Leaf path → raw leaf text, iterated in path order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedPayload {
    leaves: BTreeMap<String, String>,
}

impl FlattenedPayload {
    pub fn get(&self, path: &str) -> Option<&str> {
        self.leaves.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.leaves.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.leaves.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.leaves.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

/// Flatten one structured-text payload.
///
/// A leading UTF-8 byte order mark is ignored. Root members use their key as
/// path; a root scalar or opaque root array sits at the empty path.
///
/// # Errors
///
/// Returns [`FlattenError`] if the payload is not UTF-8 JSON.
pub fn flatten(payload: &[u8]) -> Result<FlattenedPayload, FlattenError> {
    let text = std::str::from_utf8(strip_bom(payload))?;
    let root: &RawValue = serde_json::from_str(text)?;

    let mut out = FlattenedPayload::default();
    walk(root, String::new(), &mut out.leaves)?;
    Ok(out)
}

fn walk(
    node: &RawValue,
    path: String,
    leaves: &mut BTreeMap<String, String>,
) -> Result<(), FlattenError> {
    let raw = node.get();
    match raw.as_bytes().first() {
        Some(b'{') => {
            let members: BTreeMap<String, &RawValue> = serde_json::from_str(raw)?;
            if members.is_empty() {
                return insert_leaf(leaves, path, raw);
            }
            for (key, value) in members {
                let child = if path.is_empty() {
                    key
                } else {
                    format!("{path}.{key}")
                };
                walk(value, child, leaves)?;
            }
        }
        Some(b'[') => {
            let items: Vec<&RawValue> = serde_json::from_str(raw)?;
            // Only the first element decides; mixed arrays follow it.
            let descend = items.first().is_some_and(|first| is_object(first));
            if descend {
                for (i, item) in items.into_iter().enumerate() {
                    walk(item, format!("{path}[{i}]"), leaves)?;
                }
            } else {
                insert_leaf(leaves, path, raw)?;
            }
        }
        _ => insert_leaf(leaves, path, raw)?,
    }
    Ok(())
}

fn insert_leaf(
    leaves: &mut BTreeMap<String, String>,
    path: String,
    raw: &str,
) -> Result<(), FlattenError> {
    match leaves.entry(path) {
        Entry::Occupied(slot) => Err(FlattenError::PathCollision(slot.key().clone())),
        Entry::Vacant(slot) => {
            slot.insert(raw.to_string());
            Ok(())
        }
    }
}

fn is_object(node: &RawValue) -> bool {
    node.get().starts_with('{')
}
