//! Built-in extractors for the non-numeric scalar types.

use serde_json::Value;

use crate::extraction::{ExtractResult, Extraction, ExtractionContext, Extractor, TypeKey};
use crate::value::ValueExt;

/// Extracts `bool` from JSON booleans.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolExtractor;

impl Extractor for BoolExtractor {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<bool>()
    }

    fn extract(&self, cx: &mut ExtractionContext<'_>, node: &Value) -> ExtractResult {
        node.as_bool().map_or_else(
            || cx.problem(format!("expected a boolean, found {}", node.kind_name())),
            |value| Ok(Extraction::boxed(value)),
        )
    }
}

/// Extracts `String` from JSON strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringExtractor;

impl Extractor for StringExtractor {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<String>()
    }

    fn extract(&self, cx: &mut ExtractionContext<'_>, node: &Value) -> ExtractResult {
        node.as_str().map_or_else(
            || cx.problem(format!("expected a string, found {}", node.kind_name())),
            |value| Ok(Extraction::boxed(value.to_owned())),
        )
    }
}

/// Extracts `char` from single-character JSON strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharExtractor;

impl Extractor for CharExtractor {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<char>()
    }

    fn extract(&self, cx: &mut ExtractionContext<'_>, node: &Value) -> ExtractResult {
        let Some(text) = node.as_str() else {
            return cx.problem(format!("expected a string, found {}", node.kind_name()));
        };
        let mut characters = text.chars();
        match (characters.next(), characters.next()) {
            (Some(character), None) => Ok(Extraction::boxed(character)),
            _ => cx.problem(format!(
                "expected a single-character string, found {} characters",
                text.chars().count()
            )),
        }
    }
}

/// Passthrough extractor: clones the node as a `serde_json::Value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueExtractor;

impl Extractor for ValueExtractor {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Value>()
    }

    fn extract(&self, _cx: &mut ExtractionContext<'_>, node: &Value) -> ExtractResult {
        Ok(Extraction::boxed(node.clone()))
    }
}
