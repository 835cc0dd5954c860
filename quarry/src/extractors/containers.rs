//! Generic container extractors, registered per element type.
//!
//! These recurse through the context for every element, so each element
//! independently narrows the diagnostic path and independently participates
//! in the failure policy: under `CollectAll`, a bad element records its
//! problem and the remaining siblings are still visited.

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;

use serde_json::Value;

use crate::extraction::{ExtractResult, Extraction, ExtractionContext, Extractor, TypeKey};
use crate::path::PathElement;
use crate::value::ValueExt;

/// Extracts `Vec<T>` from a JSON array, element by element.
#[derive(Debug)]
pub struct SequenceExtractor<T> {
    element: PhantomData<fn() -> T>,
}

impl<T> SequenceExtractor<T> {
    /// Create the extractor. `T` must be registered separately.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            element: PhantomData,
        }
    }
}

impl<T> Default for SequenceExtractor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any + Send> Extractor for SequenceExtractor<T> {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Vec<T>>()
    }

    fn extract(&self, cx: &mut ExtractionContext<'_>, node: &Value) -> ExtractResult {
        let Some(items) = node.as_array() else {
            return cx.problem(format!("expected an array, found {}", node.kind_name()));
        };
        let mut values = Vec::with_capacity(items.len());
        let mut failed = false;
        for index in 0..items.len() {
            match cx.try_extract_sub::<T>(node, PathElement::Index(index))? {
                Some(value) => values.push(value),
                None => failed = true,
            }
        }
        if failed {
            Ok(Extraction::Failed)
        } else {
            Ok(Extraction::boxed(values))
        }
    }
}

/// Extracts `Option<T>`: JSON `null` becomes `None`, anything else is
/// delegated to `T`'s extractor.
#[derive(Debug)]
pub struct OptionExtractor<T> {
    element: PhantomData<fn() -> T>,
}

impl<T> OptionExtractor<T> {
    /// Create the extractor. `T` must be registered separately.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            element: PhantomData,
        }
    }
}

impl<T> Default for OptionExtractor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any + Send> Extractor for OptionExtractor<T> {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Option<T>>()
    }

    fn extract(&self, cx: &mut ExtractionContext<'_>, node: &Value) -> ExtractResult {
        if node.is_null() {
            return Ok(Extraction::boxed(None::<T>));
        }
        match cx.try_extract::<T>(node)? {
            Some(value) => Ok(Extraction::boxed(Some(value))),
            None => Ok(Extraction::Failed),
        }
    }
}

/// Extracts `HashMap<String, T>` from a JSON object, member by member.
#[derive(Debug)]
pub struct MapExtractor<T> {
    element: PhantomData<fn() -> T>,
}

impl<T> MapExtractor<T> {
    /// Create the extractor. `T` must be registered separately.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            element: PhantomData,
        }
    }
}

impl<T> Default for MapExtractor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any + Send> Extractor for MapExtractor<T> {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<HashMap<String, T>>()
    }

    fn extract(&self, cx: &mut ExtractionContext<'_>, node: &Value) -> ExtractResult {
        let Some(object) = node.as_object() else {
            return cx.problem(format!("expected an object, found {}", node.kind_name()));
        };
        let mut values = HashMap::with_capacity(object.len());
        let mut failed = false;
        for key in object.keys() {
            match cx.try_extract_sub::<T>(node, PathElement::Key(key.clone()))? {
                Some(value) => {
                    values.insert(key.clone(), value);
                }
                None => failed = true,
            }
        }
        if failed {
            Ok(Extraction::Failed)
        } else {
            Ok(Extraction::boxed(values))
        }
    }
}
