//! Nested property trees addressed by separator-delimited paths.
//!
//! [`Properties`] is the element store behind every record. Each node is a
//! [`Value`]: leaves hold scalars or lists, branches ([`Value::Map`]) hold
//! another `Properties` tree.
//!
//! # Usage
//!
//! ```
//! use tessera::data::{Properties, Value};
//!
//! let mut props = Properties::new();
//! props.set("access.site.login", true)?;
//! props.def("state", "enabled")?;
//!
//! assert_eq!(props.get("access.site.login"), Some(&Value::Bool(true)));
//! assert_eq!(props.get_or("access.admin.login", false), Value::Bool(false));
//!
//! // A scalar in the middle of a path is a conflict, not a silent overwrite.
//! assert!(props.set("state.reason", "x").is_err());
//! # Ok::<(), tessera::data::DataError>(())
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod path;
pub mod value;

pub use errors::DataError;
pub use path::SEPARATOR;
pub use value::Value;

/// A tree of named values addressed by dot-separated paths.
///
/// Keys are kept sorted so that serialization and merges are deterministic.
///
/// # Write policy
///
/// [`Properties::set`] creates missing intermediate mappings and replaces
/// intermediate `null`s, but refuses to walk through any other scalar: it
/// returns [`DataError::PathConflict`] and leaves the tree untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    children: BTreeMap<String, Value>,
}

impl Properties {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the number of top-level keys.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns an iterator over the top-level entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.children.iter()
    }

    /// Returns an iterator over the top-level keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.children.keys()
    }

    // Direct (non-nested) access. Names are used verbatim, dots included.

    /// Gets a top-level value by its exact key.
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.children.get(key)
    }

    /// Gets a mutable top-level value by its exact key.
    pub fn get_key_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.children.get_mut(key)
    }

    /// Inserts a top-level value under its exact key, returning the old value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.children.insert(key.into(), value.into())
    }

    /// Removes a top-level key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.children.remove(key)
    }

    // Nested access

    /// Gets a value by dot path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.get_with(path, SEPARATOR)
    }

    /// Gets a value by path using a custom separator.
    ///
    /// Returns `None` when a segment is missing or an intermediate value is
    /// not a mapping.
    pub fn get_with(&self, path: &str, separator: char) -> Option<&Value> {
        let segments = path::segments(path, separator);
        let (first, rest) = segments.split_first()?;

        let mut current = self.children.get(*first)?;
        for segment in rest {
            current = current.as_map()?.children.get(*segment)?;
        }
        Some(current)
    }

    /// Gets a mutable value by path using a custom separator.
    pub fn get_mut_with(&mut self, path: &str, separator: char) -> Option<&mut Value> {
        let segments = path::segments(path, separator);
        let (first, rest) = segments.split_first()?;

        let mut current = self.children.get_mut(*first)?;
        for segment in rest {
            current = current.as_map_mut()?.children.get_mut(*segment)?;
        }
        Some(current)
    }

    /// Gets a value by dot path, falling back to `default` when absent.
    ///
    /// The tree is never modified.
    pub fn get_or(&self, path: &str, default: impl Into<Value>) -> Value {
        self.get_or_with(path, default, SEPARATOR)
    }

    /// [`Properties::get_or`] with a custom separator.
    pub fn get_or_with(&self, path: &str, default: impl Into<Value>, separator: char) -> Value {
        match self.get_with(path, separator) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Gets a text value by dot path.
    pub fn get_text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_text)
    }

    /// Returns true if a value exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Sets a value at a dot path, creating intermediate mappings as needed.
    ///
    /// Returns the previous value at that path.
    pub fn set(
        &mut self,
        path: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, DataError> {
        self.set_with(path, value, SEPARATOR)
    }

    /// [`Properties::set`] with a custom separator.
    pub fn set_with(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        separator: char,
    ) -> Result<Option<Value>, DataError> {
        let segments = path::segments(path, separator);
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(DataError::InvalidPath {
                path: path.to_string(),
            });
        };

        // Find conflicts before touching anything so a failed write leaves
        // the tree as it was.
        let mut probe = Some(self as &Properties);
        for (depth, segment) in parents.iter().enumerate() {
            let Some(node) = probe else { break };
            probe = match node.children.get(*segment) {
                None | Some(Value::Null) => None,
                Some(Value::Map(map)) => Some(map),
                Some(other) => {
                    return Err(DataError::PathConflict {
                        path: path.to_string(),
                        segment: parents[..=depth].join(separator.to_string().as_str()),
                        found: other.type_name(),
                    });
                }
            };
        }

        let mut current = self;
        for segment in parents {
            let entry = current
                .children
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Map(Properties::new()));
            current = ensure_map(entry);
        }

        Ok(current.children.insert((*leaf).to_string(), value.into()))
    }

    /// Removes the value at a dot path, returning it if it existed.
    ///
    /// Missing paths are not an error.
    pub fn unset(&mut self, path: &str) -> Option<Value> {
        self.unset_with(path, SEPARATOR)
    }

    /// [`Properties::unset`] with a custom separator.
    pub fn unset_with(&mut self, path: &str, separator: char) -> Option<Value> {
        let segments = path::segments(path, separator);
        let (leaf, parents) = segments.split_last()?;

        let mut current = self;
        for segment in parents {
            current = current.children.get_mut(*segment)?.as_map_mut()?;
        }
        current.children.remove(*leaf)
    }

    /// Sets `default` at a dot path only if no value is present there.
    ///
    /// A stored `null` counts as absent. Returns true if the default was
    /// written.
    pub fn def(&mut self, path: &str, default: impl Into<Value>) -> Result<bool, DataError> {
        self.def_with(path, default, SEPARATOR)
    }

    /// [`Properties::def`] with a custom separator.
    pub fn def_with(
        &mut self,
        path: &str,
        default: impl Into<Value>,
        separator: char,
    ) -> Result<bool, DataError> {
        match self.get_with(path, separator) {
            Some(value) if !value.is_null() => Ok(false),
            _ => {
                self.set_with(path, default, separator)?;
                Ok(true)
            }
        }
    }

    /// Returns a deep union of `self` and `other`.
    ///
    /// Mappings present on both sides are merged recursively; any other
    /// value from `other` replaces the one in `self`.
    pub fn merge(&self, other: &Properties) -> Properties {
        let mut result = self.clone();
        for (key, incoming) in &other.children {
            let merged = match (result.children.get(key), incoming) {
                (Some(Value::Map(existing)), Value::Map(incoming)) => {
                    Value::Map(existing.merge(incoming))
                }
                _ => incoming.clone(),
            };
            result.children.insert(key.clone(), merged);
        }
        result
    }

    /// Flattens the tree into `(path, leaf)` pairs.
    ///
    /// Empty mappings are reported as leaves so that no key is lost.
    pub fn flatten(&self, separator: char) -> Vec<(String, &Value)> {
        let mut out = Vec::new();
        self.flatten_into("", separator, &mut out);
        out
    }

    fn flatten_into<'a>(
        &'a self,
        prefix: &str,
        separator: char,
        out: &mut Vec<(String, &'a Value)>,
    ) {
        for (key, value) in &self.children {
            let full = path::join(prefix, key, separator);
            match value {
                Value::Map(map) if !map.is_empty() => map.flatten_into(&full, separator, out),
                leaf => out.push((full, leaf)),
            }
        }
    }

    /// Parses a JSON object into a tree.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Replaces a non-map value with an empty map and returns the map.
fn ensure_map(value: &mut Value) -> &mut Properties {
    if !value.is_branch() {
        *value = Value::Map(Properties::new());
    }
    match value {
        Value::Map(map) => map,
        _ => unreachable!(),
    }
}

impl FromIterator<(String, Value)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Properties {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}
