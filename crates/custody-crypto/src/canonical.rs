//! Deterministic serialization and hashing.
//!
//! Signing bytes must be identical across platforms and key orderings, so
//! envelope bodies are serialized with lexicographically sorted object keys
//! and no whitespace before hashing or signing. Arrays keep their order.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Serialize a JSON value canonically: sorted object keys, compact form.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Canonical bytes of a value, for signing or hashing.
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    canonical_json(value).into_bytes()
}

/// SHA-256 of raw bytes as a 64-character lowercase hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            out.push('{');
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Scalar Display is already compact, escaped JSON
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_value(out, &map[*key]);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_sorted_keys() {
        let value = json!({"z": 1, "a": 2, "m": 3});
        assert_eq!(canonical_json(&value), r#"{"a":2,"m":3,"z":1}"#);
    }

    #[test]
    fn test_nested_objects_sorted() {
        let value = json!({
            "b": {"y": 1, "x": 2},
            "a": {"z": 3, "w": 4}
        });
        assert_eq!(
            canonical_json(&value),
            r#"{"a":{"w":4,"z":3},"b":{"x":2,"y":1}}"#
        );
    }

    #[test]
    fn test_arrays_preserve_order() {
        let value = json!([3, 1, 2]);
        assert_eq!(canonical_json(&value), "[3,1,2]");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(canonical_json(&json!(null)), "null");
        assert_eq!(canonical_json(&json!(true)), "true");
        assert_eq!(canonical_json(&json!(-42)), "-42");
        assert_eq!(canonical_json(&json!("text")), r#""text""#);
    }

    #[test]
    fn test_string_escaping() {
        let value = json!({"text": "line1\nquote\"slash\\"});
        let canonical = canonical_json(&value);
        assert!(canonical.contains("\\n"));
        assert!(canonical.contains("\\\""));
        assert!(canonical.contains("\\\\"));
    }

    #[test]
    fn test_key_order_independence() {
        let a = json!({"parents": [], "artifactId": "x", "payload": {"b": 1, "a": 2}});
        let b = json!({"payload": {"a": 2, "b": 1}, "artifactId": "x", "parents": []});
        assert_eq!(canonical_bytes(&a), canonical_bytes(&b));
    }

    #[test]
    fn test_sha256_known_vectors() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_determinism() {
        let value = json!({"c": 3, "a": 1, "b": [true, null]});
        assert_eq!(canonical_json(&value), canonical_json(&value));
    }
}
