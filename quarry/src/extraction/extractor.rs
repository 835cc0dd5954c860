//! The converter capability interface and its runtime type identity.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use super::context::ExtractionContext;
use crate::error::ExtractionError;

/// Runtime identity of the type an [`Extractor`] produces.
///
/// Pairs the [`TypeId`] registries key on with the type's name for
/// diagnostics. Built with [`TypeKey::of`]; once an extractor is registered
/// with a [`Formats`], the key it reports is not allowed to change.
///
/// [`Formats`]: crate::formats::Formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id:   TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key for `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id:   TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The underlying [`TypeId`].
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The fully-qualified type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Outcome of a single extractor invocation.
pub enum Extraction {
    /// A fully constructed value of the extractor's reported type.
    /// Ownership transfers to the caller.
    Value(Box<dyn Any + Send>),
    /// The value could not be produced. At least one problem has already
    /// been reported through the context; the caller must not interpret
    /// anything as a valid result.
    Failed,
}

impl Extraction {
    /// Wrap a constructed `value` as a successful outcome.
    #[must_use]
    pub fn boxed<T: Any + Send>(value: T) -> Self {
        Self::Value(Box::new(value))
    }
}

impl fmt::Debug for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => f.write_str("Extraction::Value(..)"),
            Self::Failed => f.write_str("Extraction::Failed"),
        }
    }
}

/// Result type extractor invocations produce: a soft outcome on `Ok`, a hard
/// failure on `Err`.
pub type ExtractResult = crate::error::Result<Extraction>;

/// A type-identified converter from JSON nodes to typed values.
///
/// Implementations are stateless with respect to a single extraction call
/// (shared configuration captured at registration time is fine) and are
/// registered with a [`Formats`] keyed by [`Extractor::type_key`].
///
/// Contract for [`Extractor::extract`]:
///
/// - `node` is never absent -- the caller resolves paths before invoking.
/// - On success, return [`Extraction::Value`] holding exactly the type
///   reported by [`Extractor::type_key`]; a mismatch surfaces as a hard
///   failure at the downcast in the typed entry points.
/// - On a recoverable failure, report through
///   [`ExtractionContext::problem`] and return [`Extraction::Failed`] --
///   `problem` returns an [`ExtractResult`] precisely so the failure path is
///   the single expression `return cx.problem(..)`.
/// - A hard failure is any `Err`: it short-circuits the whole operation
///   regardless of failure mode.
/// - Nested fields are extracted by recursing through
///   [`ExtractionContext::try_extract_sub`], which narrows the diagnostic
///   path for the duration of the call.
///
/// [`Formats`]: crate::formats::Formats
pub trait Extractor: Send + Sync {
    /// The runtime type this extractor knows how to produce.
    fn type_key(&self) -> TypeKey;

    /// Convert `node` into a value of the reported type.
    fn extract(&self, cx: &mut ExtractionContext<'_>, node: &Value) -> ExtractResult;
}

/// Closure-backed [`Extractor`], for registrations that do not warrant a
/// named type.
///
/// The closure returns `Ok(Some(value))` on success, `Ok(None)` after
/// reporting a soft problem, and `Err` for hard failures -- the same shape
/// [`ExtractionContext::try_extract`] hands back, so extraction logic
/// composes directly.
pub struct FnExtractor<T, F> {
    function: F,
    marker:   PhantomData<fn() -> T>,
}

impl<T, F> FnExtractor<T, F>
where
    T: Any + Send,
    F: Fn(&mut ExtractionContext<'_>, &Value) -> Result<Option<T>, ExtractionError> + Send + Sync,
{
    /// Wrap `function` as an extractor producing `T`.
    pub const fn new(function: F) -> Self {
        Self {
            function,
            marker: PhantomData,
        }
    }
}

impl<T, F> Extractor for FnExtractor<T, F>
where
    T: Any + Send,
    F: Fn(&mut ExtractionContext<'_>, &Value) -> Result<Option<T>, ExtractionError> + Send + Sync,
{
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn extract(&self, cx: &mut ExtractionContext<'_>, node: &Value) -> ExtractResult {
        match (self.function)(cx, node)? {
            Some(value) => Ok(Extraction::boxed(value)),
            None => Ok(Extraction::Failed),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_type_key_identity() {
        assert_eq!(TypeKey::of::<i64>(), TypeKey::of::<i64>());
        assert_ne!(TypeKey::of::<i64>().id(), TypeKey::of::<u64>().id());
        assert_eq!(TypeKey::of::<i64>().name(), "i64");
    }

    #[test]
    fn test_type_key_display_is_name() {
        assert_eq!(TypeKey::of::<String>().to_string(), "alloc::string::String");
    }

    #[test]
    fn test_extraction_boxed_round_trip() {
        let Extraction::Value(boxed) = Extraction::boxed(7_i32) else {
            panic!("expected a value outcome");
        };
        assert_eq!(*boxed.downcast::<i32>().expect("i32 inside"), 7);
    }
}
