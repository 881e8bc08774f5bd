//! Canonical serialization and SHA-256 digests for the generation audit trail.
//!
//! `stable_stringify` renders a JSON value with object keys sorted at every
//! nesting level, so two structurally equal values always produce the same
//! bytes no matter how their maps were populated.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Deepest nesting accepted by the canonicalizer.
///
/// Owned JSON trees cannot contain reference cycles, so this bound is what
/// stands between a pathological input and unbounded recursion.
pub const MAX_CANONICAL_DEPTH: usize = 128;

/// Errors raised while canonicalizing a value.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("value nests deeper than {max} levels at {path}; cyclic or unbounded input is rejected")]
    TooDeep { max: usize, path: String },

    #[error("value cannot be represented as JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Recursively sort object keys, preserving array order.
pub fn canonicalize(value: &Value) -> Result<Value, HashError> {
    canonicalize_at(value, 0, "$")
}

fn canonicalize_at(value: &Value, depth: usize, path: &str) -> Result<Value, HashError> {
    if depth > MAX_CANONICAL_DEPTH {
        return Err(HashError::TooDeep {
            max: MAX_CANONICAL_DEPTH,
            path: path.to_owned(),
        });
    }

    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                let child = canonicalize_at(&map[key], depth + 1, &format!("{path}.{key}"))?;
                sorted.insert(key.clone(), child);
            }
            Ok(Value::Object(sorted))
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| canonicalize_at(item, depth + 1, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        primitive => Ok(primitive.clone()),
    }
}

/// Compact, key-sorted JSON rendering of `value`.
pub fn stable_stringify(value: &Value) -> Result<String, HashError> {
    let canonical = canonicalize(value)?;
    Ok(serde_json::to_string(&canonical)?)
}

/// Lowercase hex SHA-256 of the UTF-8 bytes of `input`.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// `sha256_hex(stable_stringify(value))` for any serializable value.
pub fn canonical_hash<T: Serialize + ?Sized>(value: &T) -> Result<String, HashError> {
    let json = serde_json::to_value(value)?;
    Ok(sha256_hex(&stable_stringify(&json)?))
}
