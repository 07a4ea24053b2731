//! Regression check result types and the fingerprint diff.

use serde::{Deserialize, Serialize};

/// Which side of a step a structural change was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeField {
    Input,
    Output,
}

/// One structural difference between the current trace and a previous one,
/// scoped to a single (step, field) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureChange {
    pub step_name: String,
    pub field: ChangeField,
    pub previous_structure: Vec<String>,
    pub current_structure: Vec<String>,
    pub added_keys: Vec<String>,
    pub removed_keys: Vec<String>,
}

/// Outcome of a regression check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionResult {
    pub has_regression: bool,
    pub changes: Vec<StructureChange>,
}

/// Set-style difference of two fingerprint sequences, order preserved from
/// the source sequences: `(added, removed)` where added paths are present
/// now but not before and removed paths the reverse.
pub(crate) fn diff_structures(
    previous: &[String],
    current: &[String],
) -> (Vec<String>, Vec<String>) {
    let added = current
        .iter()
        .filter(|path| !previous.contains(path))
        .cloned()
        .collect();
    let removed = previous
        .iter()
        .filter(|path| !current.contains(path))
        .cloned()
        .collect();
    (added, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identical_structures_diff_empty() {
        let a = paths(&["a", "b", "b.c"]);
        let (added, removed) = diff_structures(&a, &a);
        assert!(added.is_empty());
        assert!(removed.is_empty());
    }

    #[test]
    fn test_added_and_removed_paths() {
        let previous = paths(&["a", "b"]);
        let current = paths(&["a", "c", "c.d"]);
        let (added, removed) = diff_structures(&previous, &current);
        assert_eq!(added, paths(&["c", "c.d"]));
        assert_eq!(removed, paths(&["b"]));
    }

    #[test]
    fn test_diff_preserves_source_order() {
        let previous = paths(&["z", "a"]);
        let current = paths(&["m", "z", "k"]);
        let (added, removed) = diff_structures(&previous, &current);
        assert_eq!(added, paths(&["m", "k"]));
        assert_eq!(removed, paths(&["a"]));
    }

    #[test]
    fn test_change_field_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChangeField::Input).unwrap(),
            "\"input\""
        );
        assert_eq!(
            serde_json::to_string(&ChangeField::Output).unwrap(),
            "\"output\""
        );
    }

    #[test]
    fn test_result_wire_field_names() {
        let result = RegressionResult {
            has_regression: true,
            changes: vec![StructureChange {
                step_name: "Search".to_string(),
                field: ChangeField::Output,
                previous_structure: paths(&["a"]),
                current_structure: paths(&["a", "b"]),
                added_keys: paths(&["b"]),
                removed_keys: Vec::new(),
            }],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert!(value["hasRegression"].as_bool().unwrap());
        let change = &value["changes"][0];
        assert_eq!(change["stepName"], "Search");
        assert_eq!(change["field"], "output");
        assert_eq!(change["addedKeys"][0], "b");
        assert!(change["removedKeys"].as_array().unwrap().is_empty());
        assert!(change.as_object().unwrap().contains_key("previousStructure"));
        assert!(change.as_object().unwrap().contains_key("currentStructure"));
    }
}
