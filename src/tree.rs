//! Nested property tree.
//!
//! A layout group is a mapping from key to either a leaf value (number, text,
//! numeric vector) or another mapping of the same kind. Dotted paths such as
//! `XAxis.LineWidth` address leaves inside nested groups.
//!
//! Values serialize to plain JSON: numbers, strings, `[r, g, b]` row vectors,
//! `[[a], [b], [c]]` column vectors, and objects for nested groups. Anything
//! else is kept verbatim in [`PropertyValue::Other`] so unknown keys survive a
//! load/save cycle.

use crate::error::LayoutError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Path separator for nested property keys.
pub const PATH_SEPARATOR: char = '.';

/// A single property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum PropertyValue {
    Number(f64),
    Text(String),
    /// Row-oriented numeric vector, e.g. an RGB triple.
    Vector(Vec<f64>),
    /// Column-oriented numeric vector.
    Column(Vec<f64>),
    Group(PropertyTree),
    /// Any JSON shape outside the vocabulary above.
    Other(Value),
}

impl PropertyValue {
    pub fn is_group(&self) -> bool {
        matches!(self, PropertyValue::Group(_))
    }

    pub fn as_group(&self) -> Option<&PropertyTree> {
        match self {
            PropertyValue::Group(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numbers of a vector value regardless of orientation.
    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            PropertyValue::Vector(v) | PropertyValue::Column(v) => Some(v),
            _ => None,
        }
    }

    /// The same numbers with row and column orientation swapped.
    pub fn transposed(&self) -> PropertyValue {
        match self {
            PropertyValue::Vector(v) => PropertyValue::Column(v.clone()),
            PropertyValue::Column(v) => PropertyValue::Vector(v.clone()),
            other => other.clone(),
        }
    }

    /// Deep equality that tolerates a transposed vector.
    ///
    /// A scalar also matches a one-element vector in either orientation.
    pub fn matches(&self, other: &PropertyValue) -> bool {
        if self == other || self.transposed() == *other {
            return true;
        }
        match (self, other) {
            (PropertyValue::Number(a), b) | (b, PropertyValue::Number(a)) => {
                b.as_numbers() == Some(std::slice::from_ref(a))
            }
            _ => false,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<Vec<f64>> for PropertyValue {
    fn from(v: Vec<f64>) -> Self {
        PropertyValue::Vector(v)
    }
}

impl<const N: usize> From<[f64; N]> for PropertyValue {
    fn from(v: [f64; N]) -> Self {
        PropertyValue::Vector(v.to_vec())
    }
}

impl From<PropertyTree> for PropertyValue {
    fn from(tree: PropertyTree) -> Self {
        PropertyValue::Group(tree)
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Numbers of a flat array, or `None` if any element is not a number.
fn numeric_row(items: &[Value]) -> Option<Vec<f64>> {
    items.iter().map(Value::as_f64).collect()
}

/// Numbers of an `[[a], [b], ...]` array, or `None` if it is not that shape.
fn numeric_column(items: &[Value]) -> Option<Vec<f64>> {
    items
        .iter()
        .map(|item| match item.as_array().map(Vec::as_slice) {
            Some([single]) => single.as_f64(),
            _ => None,
        })
        .collect()
}

impl From<PropertyValue> for Value {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Number(n) => number_to_json(n),
            PropertyValue::Text(s) => Value::String(s),
            PropertyValue::Vector(v) => Value::Array(v.into_iter().map(number_to_json).collect()),
            PropertyValue::Column(v) => Value::Array(
                v.into_iter()
                    .map(|n| Value::Array(vec![number_to_json(n)]))
                    .collect(),
            ),
            PropertyValue::Group(tree) => Value::Object(tree.into_json_map()),
            PropertyValue::Other(v) => v,
        }
    }
}

impl TryFrom<Value> for PropertyValue {
    type Error = LayoutError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Number(n) => match n.as_f64() {
                Some(f) => PropertyValue::Number(f),
                None => PropertyValue::Other(Value::Number(n)),
            },
            Value::String(s) => PropertyValue::Text(s),
            Value::Array(items) => {
                if items.is_empty() {
                    PropertyValue::Other(Value::Array(items))
                } else if let Some(row) = numeric_row(&items) {
                    PropertyValue::Vector(row)
                } else if let Some(column) = numeric_column(&items) {
                    PropertyValue::Column(column)
                } else {
                    PropertyValue::Other(Value::Array(items))
                }
            }
            Value::Object(map) => PropertyValue::Group(PropertyTree::from_json_map(map)?),
            other => PropertyValue::Other(other),
        })
    }
}

/// A recursively nestable mapping from key to [`PropertyValue`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyTree {
    entries: BTreeMap<String, PropertyValue>,
}

impl PropertyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-level entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.entries.iter()
    }

    /// Look up a value by dotted path.
    pub fn get(&self, path: &str) -> Option<&PropertyValue> {
        let mut segments = path.split(PATH_SEPARATOR);
        let first = segments.next()?;
        let mut current = self.entries.get(first)?;
        for segment in segments {
            current = current.as_group()?.entries.get(segment)?;
        }
        Some(current)
    }

    /// Whether the value at `path` is itself a nested group.
    pub fn is_group(&self, path: &str) -> bool {
        self.get(path).is_some_and(PropertyValue::is_group)
    }

    /// Keys of the group at `path`; an empty path names this tree.
    ///
    /// Returns `None` when `path` does not address a group.
    pub fn keys_at(&self, path: &str) -> Option<Vec<&str>> {
        let group = if path.is_empty() {
            self
        } else {
            self.get(path)?.as_group()?
        };
        Some(group.entries.keys().map(String::as_str).collect())
    }

    /// Insert a value at a dotted path, creating intermediate groups.
    ///
    /// A leaf standing where an intermediate group is needed is replaced.
    pub fn insert(&mut self, path: &str, value: impl Into<PropertyValue>) {
        match path.split_once(PATH_SEPARATOR) {
            None => {
                self.entries.insert(path.to_string(), value.into());
            }
            Some((head, rest)) => {
                let slot = self
                    .entries
                    .entry(head.to_string())
                    .or_insert_with(|| PropertyValue::Group(PropertyTree::new()));
                if !slot.is_group() {
                    *slot = PropertyValue::Group(PropertyTree::new());
                }
                if let PropertyValue::Group(child) = slot {
                    child.insert(rest, value);
                }
            }
        }
    }

    /// Remove and return the value at a dotted path.
    pub fn remove(&mut self, path: &str) -> Option<PropertyValue> {
        match path.split_once(PATH_SEPARATOR) {
            None => self.entries.remove(path),
            Some((head, rest)) => match self.entries.get_mut(head)? {
                PropertyValue::Group(child) => child.remove(rest),
                _ => None,
            },
        }
    }

    /// All leaves, depth-first, as `(dotted_path, value)` pairs.
    pub fn leaves(&self) -> Vec<(String, &PropertyValue)> {
        let mut out = Vec::new();
        self.collect_leaves("", &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a PropertyValue)>) {
        for (key, value) in &self.entries {
            let path = join_path(prefix, key);
            match value {
                PropertyValue::Group(child) => child.collect_leaves(&path, out),
                leaf => out.push((path, leaf)),
            }
        }
    }

    fn into_json_map(self) -> Map<String, Value> {
        self.entries
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect()
    }

    fn from_json_map(map: Map<String, Value>) -> Result<Self, LayoutError> {
        let entries = map
            .into_iter()
            .map(|(k, v)| Ok((k, PropertyValue::try_from(v)?)))
            .collect::<Result<_, LayoutError>>()?;
        Ok(Self { entries })
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyTree
where
    K: AsRef<str>,
    V: Into<PropertyValue>,
{
    /// Builds a tree from dotted paths.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = PropertyTree::new();
        for (path, value) in iter {
            tree.insert(path.as_ref(), value);
        }
        tree
    }
}

/// Join a parent path and a key with the path separator.
pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_SEPARATOR, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn axes_tree() -> PropertyTree {
        PropertyTree::from_iter([
            ("FontSize", PropertyValue::from(18.0)),
            ("XGrid", PropertyValue::from("on")),
            ("XAxis.LineWidth", PropertyValue::from(1.5)),
            ("YAxis.LineWidth", PropertyValue::from(2.0)),
        ])
    }

    #[test]
    fn test_get_dotted_path() {
        let tree = axes_tree();
        assert_eq!(tree.get("FontSize"), Some(&PropertyValue::Number(18.0)));
        assert_eq!(
            tree.get("XAxis.LineWidth"),
            Some(&PropertyValue::Number(1.5))
        );
        assert_eq!(tree.get("XAxis.Color"), None);
        assert_eq!(tree.get("FontSize.Inner"), None);
    }

    #[test]
    fn test_is_group_and_keys_at() {
        let tree = axes_tree();
        assert!(tree.is_group("XAxis"));
        assert!(!tree.is_group("FontSize"));
        assert!(!tree.is_group("Missing"));
        assert_eq!(
            tree.keys_at(""),
            Some(vec!["FontSize", "XAxis", "XGrid", "YAxis"])
        );
        assert_eq!(tree.keys_at("XAxis"), Some(vec!["LineWidth"]));
        assert_eq!(tree.keys_at("FontSize"), None);
    }

    #[test]
    fn test_leaves_depth_first() {
        let tree = axes_tree();
        let paths: Vec<String> = tree.leaves().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            vec!["FontSize", "XAxis.LineWidth", "XGrid", "YAxis.LineWidth"]
        );
    }

    #[test]
    fn test_insert_replaces_leaf_with_group() {
        let mut tree = PropertyTree::new();
        tree.insert("XAxis", 3.0);
        tree.insert("XAxis.LineWidth", 1.0);
        assert!(tree.is_group("XAxis"));
        assert_eq!(tree.get("XAxis.LineWidth"), Some(&PropertyValue::Number(1.0)));
    }

    #[test]
    fn test_remove_nested() {
        let mut tree = axes_tree();
        assert_eq!(tree.remove("XAxis.LineWidth"), Some(PropertyValue::Number(1.5)));
        assert_eq!(tree.get("XAxis.LineWidth"), None);
        assert_eq!(tree.remove("FontSize.Nope"), None);
    }

    #[test]
    fn test_json_shapes() {
        let tree: PropertyTree = serde_json::from_value(json!({
            "Color": [1, 1, 1],
            "Tint": [[0.5], [0.25], [0]],
            "FontSize": 18,
            "Units": "pixels",
            "Visible": true,
            "XAxis": {"LineWidth": 1.5}
        }))
        .unwrap();

        assert_eq!(
            tree.get("Color"),
            Some(&PropertyValue::Vector(vec![1.0, 1.0, 1.0]))
        );
        assert_eq!(
            tree.get("Tint"),
            Some(&PropertyValue::Column(vec![0.5, 0.25, 0.0]))
        );
        assert_eq!(tree.get("Visible"), Some(&PropertyValue::Other(json!(true))));
        assert!(tree.is_group("XAxis"));
    }

    #[test]
    fn test_integral_numbers_serialize_as_integers() {
        let tree = PropertyTree::from_iter([
            ("FontSize", PropertyValue::from(18.0)),
            ("LineWidth", PropertyValue::from(1.5)),
            ("Color", PropertyValue::from([1.0, 0.0, 0.5])),
        ]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            json!({"Color": [1, 0, 0.5], "FontSize": 18, "LineWidth": 1.5})
        );
    }

    #[test]
    fn test_matches_transposed() {
        let row = PropertyValue::Vector(vec![1.0, 0.5, 0.0]);
        let col = PropertyValue::Column(vec![1.0, 0.5, 0.0]);
        assert!(row.matches(&col));
        assert!(col.matches(&row));
        assert!(!row.matches(&PropertyValue::Vector(vec![0.0, 0.5, 1.0])));
    }

    #[test]
    fn test_matches_scalar_against_single_element_vector() {
        let scalar = PropertyValue::Number(2.0);
        assert!(scalar.matches(&PropertyValue::Vector(vec![2.0])));
        assert!(PropertyValue::Column(vec![2.0]).matches(&scalar));
        assert!(!scalar.matches(&PropertyValue::Vector(vec![2.0, 2.0])));
        assert!(!scalar.matches(&PropertyValue::Text("2".into())));
    }
}
