use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Name of the checksum manifest a package stores about itself.
///
/// It embeds hashes of every other entry and so can never hash equal
/// across a re-save; every strategy skips it by default.
pub const CHECKSUM_ENTRY: &str = "checksum.json";

/// Normalization applied to an entry's bytes before hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashStrategy {
    /// Hash bytes verbatim
    Raw,
    /// Canonicalize volatile text formatting first
    #[default]
    Normalized,
}

/// Per-entry hasher bound to one strategy and one skip list.
///
/// Skip patterns match an exact entry name, or every entry beneath a
/// directory prefix when the pattern ends with `/`.
#[derive(Debug, Clone)]
pub struct ContentHasher {
    strategy: HashStrategy,
    skip: Vec<String>,
}

impl ContentHasher {
    /// Hasher with the default skip list (`checksum.json`)
    pub fn new(strategy: HashStrategy) -> Self {
        Self {
            strategy,
            skip: vec![CHECKSUM_ENTRY.to_string()],
        }
    }

    /// Replace the skip list
    pub fn with_skip_entries(mut self, skip: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.skip = skip.into_iter().map(Into::into).collect();
        self
    }

    pub fn strategy(&self) -> HashStrategy {
        self.strategy
    }

    /// Whether the strategy declines to hash `name`
    pub fn skips(&self, name: &str) -> bool {
        self.skip.iter().any(|pattern| {
            if pattern.ends_with('/') {
                name.starts_with(pattern.as_str())
            } else {
                name == pattern
            }
        })
    }

    /// Hash one entry.
    ///
    /// Returns `None` when the entry is on the skip list: the entry is then
    /// not comparable under this strategy, which is different from a mismatch.
    pub fn hash(&self, name: &str, bytes: &[u8]) -> Option<String> {
        if self.skips(name) {
            return None;
        }
        let normalized = match self.strategy {
            HashStrategy::Raw => Cow::Borrowed(bytes),
            HashStrategy::Normalized => normalize(name, bytes),
        };
        Some(sha256_hex(&normalized))
    }
}

/// Hex-encoded SHA256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// JSON entries re-serialize compactly with sorted keys; any other entry
/// only has CRLF folded to LF.
fn normalize<'a>(name: &str, bytes: &'a [u8]) -> Cow<'a, [u8]> {
    if is_json_name(name) {
        if let Some(canonical) = canonical_json(strip_bom(bytes)) {
            return Cow::Owned(canonical.into_bytes());
        }
    }
    if bytes.windows(2).any(|w| w == b"\r\n") {
        let mut out = Vec::with_capacity(bytes.len());
        let mut iter = bytes.iter().peekable();
        while let Some(&b) = iter.next() {
            if b == b'\r' && iter.peek() == Some(&&b'\n') {
                continue;
            }
            out.push(b);
        }
        return Cow::Owned(out);
    }
    Cow::Borrowed(bytes)
}

fn is_json_name(name: &str) -> bool {
    name.rsplit('.')
        .next()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

/// Compact JSON with sorted keys. Scalars keep their exact source token,
/// so `1.0` and `1.00` still hash apart.
fn canonical_json(text: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(text).ok()?;
    let root: &RawValue = serde_json::from_str(text).ok()?;
    let mut out = String::with_capacity(text.len());
    write_canonical(root, &mut out).ok()?;
    Some(out)
}

fn write_canonical(node: &RawValue, out: &mut String) -> Result<(), serde_json::Error> {
    let raw = node.get();
    match raw.as_bytes().first() {
        Some(b'{') => {
            let members: BTreeMap<String, &RawValue> = serde_json::from_str(raw)?;
            out.push('{');
            for (i, (key, value)) in members.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(&key)?);
                out.push(':');
                write_canonical(value, out)?;
            }
            out.push('}');
        }
        Some(b'[') => {
            let items: Vec<&RawValue> = serde_json::from_str(raw)?;
            out.push('[');
            for (i, item) in items.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        _ => out.push_str(raw),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_hash_is_sha256_hex() {
        let hasher = ContentHasher::new(HashStrategy::Raw);
        let hash = hasher.hash("a.bin", b"test").unwrap();
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, sha256_hex(b"test"));
    }

    #[test]
    fn test_normalized_ignores_json_whitespace_and_key_order() {
        let hasher = ContentHasher::new(HashStrategy::Normalized);
        let a = hasher.hash("Header.json", br#"{"b": 2, "a": [1, 2]}"#);
        let b = hasher.hash("Header.json", b"{\n  \"a\":[1,2],\n  \"b\":2\n}");
        assert_eq!(a, b);
    }

    #[test]
    fn test_raw_sees_json_whitespace() {
        let hasher = ContentHasher::new(HashStrategy::Raw);
        let a = hasher.hash("Header.json", br#"{"a":1}"#);
        let b = hasher.hash("Header.json", br#"{ "a": 1 }"#);
        assert_ne!(a, b);
    }

    #[test]
    fn test_normalized_keeps_number_spelling() {
        let hasher = ContentHasher::new(HashStrategy::Normalized);
        let a = hasher.hash("n.json", br#"{"a":1}"#);
        let b = hasher.hash("n.json", br#"{"a":1.0}"#);
        assert_ne!(a, b);
    }

    #[test]
    fn test_normalized_keeps_float_spelling() {
        let hasher = ContentHasher::new(HashStrategy::Normalized);
        for (a, b) in [
            (r#"{"n":1.0}"#, r#"{"n":1.00}"#),
            (r#"{"n":1e2}"#, r#"{"n":100.0}"#),
            (r#"{"n":0.10000000000000000001}"#, r#"{"n":0.10000000000000000002}"#),
        ] {
            assert_ne!(
                hasher.hash("n.json", a.as_bytes()),
                hasher.hash("n.json", b.as_bytes()),
                "{a} vs {b}"
            );
        }
    }

    #[test]
    fn test_canonical_json_only_touches_layout() {
        let canonical =
            canonical_json(b"{ \"z\" : [ 1.50 , {\"b\":1e3, \"a\":\"x y\"} ], \"a\" : null }");
        assert_eq!(
            canonical.as_deref(),
            Some(r#"{"a":null,"z":[1.50,{"a":"x y","b":1e3}]}"#)
        );
    }

    #[test]
    fn test_normalized_falls_back_for_invalid_json() {
        let hasher = ContentHasher::new(HashStrategy::Normalized);
        assert_eq!(
            hasher.hash("bad.json", b"{oops\r\n"),
            Some(sha256_hex(b"{oops\n"))
        );
    }

    #[test]
    fn test_normalized_folds_crlf_in_text_entries() {
        let hasher = ContentHasher::new(HashStrategy::Normalized);
        assert_eq!(
            hasher.hash("notes.txt", b"a\r\nb\r\n"),
            hasher.hash("notes.txt", b"a\nb\n")
        );
    }

    #[test]
    fn test_checksum_entry_skipped_by_default() {
        let hasher = ContentHasher::new(HashStrategy::Raw);
        assert!(hasher.hash(CHECKSUM_ENTRY, b"{}").is_none());
    }

    #[test]
    fn test_directory_skip_pattern() {
        let hasher = ContentHasher::new(HashStrategy::Raw).with_skip_entries(["Entropy/"]);
        assert!(hasher.hash("Entropy/order.json", b"[]").is_none());
        assert!(hasher.hash("EntropyNot.json", b"[]").is_some());
        assert!(hasher.hash(CHECKSUM_ENTRY, b"{}").is_some());
    }

    #[test]
    fn test_bom_does_not_change_normalized_hash() {
        let hasher = ContentHasher::new(HashStrategy::Normalized);
        assert_eq!(
            hasher.hash("a.json", b"\xEF\xBB\xBF{\"a\":1}"),
            hasher.hash("a.json", b"{\"a\":1}")
        );
    }
}
