//! Typed value extraction from JSON documents.
//!
//! `quarry` converts untyped [`serde_json::Value`] trees into strongly-typed
//! application values through a registry of pluggable converters
//! ("extractors") resolved by runtime type identity. Every failure is
//! attributed to an exact structural path (`.items[2].name`), and the
//! failure policy is configurable: fail on the first problem, or collect a
//! bounded batch of problems before giving up.
//!
//! # Usage
//!
//! ```
//! use quarry::{Formats, JsonPath};
//! use serde_json::json;
//!
//! let mut formats = Formats::with_defaults();
//! formats.register_sequence::<i64>();
//!
//! let doc = json!({ "totals": [3, 4, 5] });
//! let path = ".totals".parse::<JsonPath>()?;
//! let totals: Vec<i64> = quarry::extract_at(&doc, path, &formats)?;
//! assert_eq!(totals, vec![3, 4, 5]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Applications plug their own types in by registering an
//! [`extraction::Extractor`] implementation (or a closure via
//! [`Formats::register_fn`]) and recursing through the
//! [`extraction::ExtractionContext`] for nested fields.

pub mod error;
pub mod extraction;
pub mod extractors;
pub mod formats;
pub mod path;
pub mod value;

use std::any::Any;

use serde_json::Value;

pub use crate::error::{ExtractionError, Problem, Result};
pub use crate::extraction::{
    DuplicateKeyAction, ExtractOptions, ExtractionContext, Extractor, FailureMode,
};
pub use crate::formats::Formats;
pub use crate::path::{JsonPath, PathElement};

/// Extract a `T` from `node` using `formats` and default options.
pub fn extract<T: Any + Send>(node: &Value, formats: &Formats) -> Result<T> {
    ExtractionContext::new(formats).extract(node)
}

/// Extract a `T` from `node.at_path(subpath)` using `formats` and default
/// options.
pub fn extract_at<T: Any + Send>(
    node: &Value,
    subpath: impl Into<JsonPath>,
    formats: &Formats,
) -> Result<T> {
    ExtractionContext::new(formats).extract_sub(node, subpath)
}
