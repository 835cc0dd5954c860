//! Path-based access to `serde_json` values.
//!
//! The AST this crate extracts from is [`serde_json::Value`]; this module
//! supplies the two pieces of behavior extraction needs on top of it:
//! resolving a [`JsonPath`] against a value tree, and assembling objects from
//! key/value streams under a configurable duplicate-key policy.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::extraction::DuplicateKeyAction;
use crate::path::{JsonPath, PathElement};

/// Error produced when a [`JsonPath`] does not resolve against a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathResolveError {
    /// The object has no member with the requested key.
    #[error("missing key `{key}` in object")]
    MissingKey {
        /// The key that was not found.
        key: String,
    },
    /// The array is shorter than the requested index.
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The actual array length.
        len:   usize,
    },
    /// A key element was applied to a non-object value.
    #[error("cannot look up key `{key}` in {kind} value")]
    KeyOnNonObject {
        /// The key element that could not be applied.
        key:  String,
        /// The kind of value actually found.
        kind: &'static str,
    },
    /// An index element was applied to a non-array value.
    #[error("cannot index into {kind} value with [{index}]")]
    IndexOnNonArray {
        /// The index element that could not be applied.
        index: usize,
        /// The kind of value actually found.
        kind:  &'static str,
    },
}

/// Extension trait adding path resolution and kind naming to
/// [`serde_json::Value`].
pub trait ValueExt {
    /// Resolve `path` against this value, returning the addressed node.
    ///
    /// The empty path resolves to the value itself. Fails on the first
    /// element that does not resolve, naming the offending key or index.
    fn at_path(&self, path: &JsonPath) -> Result<&Value, PathResolveError>;

    /// Lowercase name of this value's JSON kind, for diagnostics.
    fn kind_name(&self) -> &'static str;
}

impl ValueExt for Value {
    fn at_path(&self, path: &JsonPath) -> Result<&Value, PathResolveError> {
        let mut current = self;
        for element in path {
            current = match element {
                PathElement::Key(key) => match current {
                    Self::Object(map) => {
                        map.get(key).ok_or_else(|| PathResolveError::MissingKey {
                            key: key.clone(),
                        })?
                    }
                    other => {
                        return Err(PathResolveError::KeyOnNonObject {
                            key:  key.clone(),
                            kind: other.kind_name(),
                        });
                    }
                },
                PathElement::Index(index) => match current {
                    Self::Array(items) => {
                        items
                            .get(*index)
                            .ok_or(PathResolveError::IndexOutOfBounds {
                                index: *index,
                                len:   items.len(),
                            })?
                    }
                    other => {
                        return Err(PathResolveError::IndexOnNonArray {
                            index: *index,
                            kind:  other.kind_name(),
                        });
                    }
                },
            };
        }
        Ok(current)
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

/// Error produced by [`assemble_object`] under
/// [`DuplicateKeyAction::Error`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("duplicate object key `{key}`")]
pub struct DuplicateKeyError {
    /// The key that appeared more than once.
    key: String,
}

impl DuplicateKeyError {
    /// The key that appeared more than once.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Build an object from a key/value stream, resolving repeated keys
/// according to `action`.
///
/// This is the consumer of [`ExtractOptions::on_duplicate_key`]: document
/// assembly steps that can observe repeated keys (streaming readers, merge
/// layers) funnel through here, so `{"a":1,"a":2,"a":3}` becomes `3` under
/// [`DuplicateKeyAction::Replace`], `1` under [`DuplicateKeyAction::Ignore`],
/// and an error under [`DuplicateKeyAction::Error`].
///
/// [`ExtractOptions::on_duplicate_key`]: crate::extraction::ExtractOptions::on_duplicate_key
pub fn assemble_object(
    entries: impl IntoIterator<Item = (String, Value)>,
    action: DuplicateKeyAction,
) -> Result<Map<String, Value>, DuplicateKeyError> {
    let mut object = Map::new();
    for (key, value) in entries {
        match action {
            DuplicateKeyAction::Replace => {
                object.insert(key, value);
            }
            DuplicateKeyAction::Ignore => {
                object.entry(key).or_insert(value);
            }
            DuplicateKeyAction::Error => {
                if object.contains_key(&key) {
                    return Err(DuplicateKeyError { key });
                }
                object.insert(key, value);
            }
        }
    }
    Ok(object)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({
            "a": { "b": [10, 20, 30] },
            "s": "text",
        })
    }

    #[test]
    fn test_at_path_resolves_nested() {
        let value = sample();
        let path: JsonPath = ".a.b[1]".parse().unwrap();
        assert_eq!(value.at_path(&path).unwrap(), &json!(20));
    }

    #[test]
    fn test_at_path_root() {
        let value = sample();
        assert_eq!(value.at_path(&JsonPath::root()).unwrap(), &value);
    }

    #[test]
    fn test_at_path_missing_key() {
        let value = sample();
        let path: JsonPath = ".a.missing".parse().unwrap();
        assert_eq!(
            value.at_path(&path),
            Err(PathResolveError::MissingKey {
                key: "missing".to_string(),
            })
        );
    }

    #[test]
    fn test_at_path_index_out_of_bounds() {
        let value = sample();
        let path: JsonPath = ".a.b[9]".parse().unwrap();
        assert_eq!(
            value.at_path(&path),
            Err(PathResolveError::IndexOutOfBounds { index: 9, len: 3 })
        );
    }

    #[test]
    fn test_at_path_kind_mismatches() {
        let value = sample();
        let key_on_string: JsonPath = ".s.x".parse().unwrap();
        assert_eq!(
            value.at_path(&key_on_string),
            Err(PathResolveError::KeyOnNonObject {
                key:  "x".to_string(),
                kind: "string",
            })
        );
        let index_on_object: JsonPath = ".a[0]".parse().unwrap();
        assert_eq!(
            value.at_path(&index_on_object),
            Err(PathResolveError::IndexOnNonArray {
                index: 0,
                kind:  "object",
            })
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(json!(null).kind_name(), "null");
        assert_eq!(json!(true).kind_name(), "boolean");
        assert_eq!(json!(1.5).kind_name(), "number");
        assert_eq!(json!("x").kind_name(), "string");
        assert_eq!(json!([]).kind_name(), "array");
        assert_eq!(json!({}).kind_name(), "object");
    }

    fn duplicate_entries() -> Vec<(String, Value)> {
        vec![
            ("a".to_string(), json!(1)),
            ("a".to_string(), json!(2)),
            ("a".to_string(), json!(3)),
        ]
    }

    #[test]
    fn test_assemble_object_replace_keeps_last() {
        let object =
            assemble_object(duplicate_entries(), DuplicateKeyAction::Replace).unwrap();
        assert_eq!(object.get("a"), Some(&json!(3)));
    }

    #[test]
    fn test_assemble_object_ignore_keeps_first() {
        let object =
            assemble_object(duplicate_entries(), DuplicateKeyAction::Ignore).unwrap();
        assert_eq!(object.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_assemble_object_error_names_key() {
        let error =
            assemble_object(duplicate_entries(), DuplicateKeyAction::Error).unwrap_err();
        assert_eq!(error.key(), "a");
    }
}
