//! Structural fingerprinting of arbitrary JSON values.
//!
//! A fingerprint is the ordered list of paths describing a value's shape,
//! ignoring the data itself: `{"candidates": [{"price": 1}]}` fingerprints
//! as `["candidates", "candidates[]", "candidates[0].price"]`. Two values
//! with the same fingerprint are structurally equivalent, which is what the
//! regression checker compares across pipeline runs.

use serde_json::{Map, Value};

/// Extracts the structural fingerprint of a JSON value.
///
/// Arrays are sampled shallowly: only element 0 is inspected, on the
/// assumption that arrays are homogeneous. Deepening this to a full
/// traversal would change regression results for existing stores, so the
/// sampling rule is part of the contract.
pub fn structure_of(value: &Value) -> Vec<String> {
    structure_of_prefixed(value, "")
}

/// Extracts the structural fingerprint under an explicit path prefix.
pub fn structure_of_prefixed(value: &Value, prefix: &str) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => {
            let mut paths = vec![format!("{prefix}[]")];
            if let Some(first) = items.first() {
                paths.extend(structure_of_prefixed(first, &format!("{prefix}[0]")));
            }
            paths
        }
        Value::Object(map) => {
            let mut paths = Vec::new();
            for (key, child) in map {
                let full = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                paths.push(full.clone());
                paths.extend(structure_of_prefixed(child, &full));
            }
            paths
        }
        // Bare scalar: the path itself, or a literal token at the root.
        _ => {
            if prefix.is_empty() {
                vec!["value".to_string()]
            } else {
                vec![prefix.to_string()]
            }
        }
    }
}

/// Fingerprints a top-level JSON object, key by key in insertion order.
///
/// Equivalent to [`structure_of`] on `Value::Object` without cloning the
/// map into a `Value`.
pub fn object_structure(map: &Map<String, Value>) -> Vec<String> {
    let mut paths = Vec::new();
    for (key, child) in map {
        paths.push(key.clone());
        paths.extend(structure_of_prefixed(child, key));
    }
    paths
}
