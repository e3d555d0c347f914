//! Recursive window-parameter trees and their priority merge.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A nested string-keyed parameter mapping.
///
/// Window parameters are free-form configuration handed to the radio and
/// ground equipment. Keys map to either a subtree or an atomic scalar;
/// arrays count as scalars, so a merge replaces them wholesale rather than
/// concatenating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterTree(BTreeMap<String, ParamValue>);

/// A single entry in a [`ParameterTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A nested mapping. Listed first so any JSON/YAML object deserializes
    /// as a subtree rather than an opaque scalar.
    Tree(ParameterTree),
    /// An atomic leaf: string, number, bool, null, or array.
    Scalar(serde_json::Value),
}

impl ParameterTree {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) -> Option<ParamValue> {
        self.0.insert(key.into(), value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Look up a nested value by a dot-separated path (`"a.b.c"`).
    pub fn lookup(&self, path: &str) -> Option<&ParamValue> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            match current {
                ParamValue::Tree(subtree) => current = subtree.0.get(part)?,
                ParamValue::Scalar(_) => return None,
            }
        }
        Some(current)
    }
}

/// Merge two parameter trees, `primary` winning every key collision.
///
/// Keys present in only one tree are copied over. When both sides hold a
/// subtree under the same key the merge recurses, keeping primary priority
/// at every depth. Any other collision takes `primary`'s value verbatim:
/// no type coercion, no array concatenation, no error.
pub fn merge_parameters(primary: &ParameterTree, secondary: &ParameterTree) -> ParameterTree {
    let mut merged = primary.0.clone();
    for (key, value) in &secondary.0 {
        let entry = match (merged.get(key), value) {
            (Some(ParamValue::Tree(p)), ParamValue::Tree(s)) => {
                Some(ParamValue::Tree(merge_parameters(p, s)))
            }
            // Primary holds the key with a scalar on either side: keep it.
            (Some(_), _) => None,
            (None, _) => Some(value.clone()),
        };
        if let Some(entry) = entry {
            merged.insert(key.clone(), entry);
        }
    }
    ParameterTree(merged)
}
