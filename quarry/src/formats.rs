//! The extractor registry: an ordered, composable lookup table from runtime
//! type identity to [`Extractor`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{ExtractionError, Result};
use crate::extraction::{
    ExtractResult, ExtractionContext, Extractor, FnExtractor, TypeKey,
};
use crate::extractors::{
    BoolExtractor, CharExtractor, F32Extractor, F64Extractor, I8Extractor, I16Extractor,
    I32Extractor, I64Extractor, StringExtractor, U8Extractor, U16Extractor, U32Extractor,
    U64Extractor, ValueExtractor,
};
use crate::extractors::{MapExtractor, OptionExtractor, SequenceExtractor};

/// A lookup table from runtime type identity to the [`Extractor`] that
/// services it.
///
/// `Formats` is cheap to clone (entries are shared) and read-only once
/// handed to an [`ExtractionContext`], which makes concurrent lookup from
/// independent extractions safe. Registration replaces any previous
/// extractor for the same type; precedence between *registries* is decided
/// by [`Formats::compose`], where earlier registries shadow later ones.
#[derive(Clone, Default)]
pub struct Formats {
    extractors: HashMap<TypeId, Arc<dyn Extractor>>,
}

impl Formats {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with extractors for the primitive types
    /// registered: all integer widths through 64 bits, `f32`/`f64`,
    /// `bool`, `String`, `char`, and `serde_json::Value` passthrough.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut formats = Self::new();
        formats.register(Arc::new(I8Extractor));
        formats.register(Arc::new(I16Extractor));
        formats.register(Arc::new(I32Extractor));
        formats.register(Arc::new(I64Extractor));
        formats.register(Arc::new(U8Extractor));
        formats.register(Arc::new(U16Extractor));
        formats.register(Arc::new(U32Extractor));
        formats.register(Arc::new(U64Extractor));
        formats.register(Arc::new(F32Extractor));
        formats.register(Arc::new(F64Extractor));
        formats.register(Arc::new(BoolExtractor));
        formats.register(Arc::new(StringExtractor));
        formats.register(Arc::new(CharExtractor));
        formats.register(Arc::new(ValueExtractor));
        formats
    }

    /// Register `extractor` under the type it reports.
    ///
    /// A previous registration for the same type is replaced.
    pub fn register(&mut self, extractor: Arc<dyn Extractor>) {
        let key = extractor.type_key();
        if self.extractors.insert(key.id(), extractor).is_some() {
            debug!(ty = key.name(), "replacing registered extractor");
        }
    }

    /// Register a closure as the extractor for `T`.
    ///
    /// The closure returns `Ok(Some(value))` on success and `Ok(None)`
    /// after reporting a soft problem through the context.
    pub fn register_fn<T, F>(&mut self, function: F)
    where
        T: Any + Send,
        F: Fn(&mut ExtractionContext<'_>, &Value) -> Result<Option<T>> + Send + Sync + 'static,
    {
        self.register(Arc::new(FnExtractor::new(function)));
    }

    /// Register extraction of `Vec<T>` from JSON arrays. `T` itself must
    /// also be registered.
    pub fn register_sequence<T: Any + Send>(&mut self) {
        self.register(Arc::new(SequenceExtractor::<T>::new()));
    }

    /// Register extraction of `Option<T>` (JSON `null` becomes `None`).
    /// `T` itself must also be registered.
    pub fn register_option<T: Any + Send>(&mut self) {
        self.register(Arc::new(OptionExtractor::<T>::new()));
    }

    /// Register extraction of `HashMap<String, T>` from JSON objects. `T`
    /// itself must also be registered.
    pub fn register_map<T: Any + Send>(&mut self) {
        self.register(Arc::new(MapExtractor::<T>::new()));
    }

    /// Compose registries into one, with earlier registries taking
    /// precedence: an extractor registered in an earlier part shadows one
    /// registered for the same type in a later part.
    #[must_use]
    pub fn compose(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut composed = Self::new();
        for part in parts {
            for (id, extractor) in part.extractors {
                composed.extractors.entry(id).or_insert(extractor);
            }
        }
        composed
    }

    /// The extractor registered for the given type identity, if any.
    #[must_use]
    pub fn resolve(&self, id: TypeId) -> Option<Arc<dyn Extractor>> {
        self.extractors.get(&id).cloned()
    }

    /// Whether an extractor is registered for `T`.
    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.extractors.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered extractors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Whether no extractors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Resolve the extractor for `key` and invoke it on `node`.
    ///
    /// This is the lookup-then-invoke seam [`ExtractionContext`] dispatches
    /// through. Resolution failure is a hard failure at the context's
    /// current path, naming the unresolved type.
    pub fn extract(
        &self,
        key: TypeKey,
        node: &Value,
        cx: &mut ExtractionContext<'_>,
    ) -> ExtractResult {
        let Some(extractor) = self.resolve(key.id()) else {
            return Err(ExtractionError::at(
                cx.current_path().clone(),
                format!("no extractor registered for type `{key}`"),
            ));
        };
        trace!(ty = key.name(), path = %cx.current_path(), "dispatching extractor");
        extractor.extract(cx, node)
    }
}

impl fmt::Debug for Formats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self
            .extractors
            .values()
            .map(|extractor| extractor.type_key().name())
            .collect();
        names.sort_unstable();
        f.debug_struct("Formats").field("types", &names).finish()
    }
}
