//! The extraction orchestrator: dispatch, path narrowing, and the failure
//! policy.

use std::any::{Any, type_name};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use super::extractor::{ExtractResult, Extraction, TypeKey};
use super::options::{ExtractOptions, FailureMode};
use crate::error::{Cause, ExtractionError, Problem, Result};
use crate::formats::Formats;
use crate::path::JsonPath;
use crate::value::ValueExt;

/// Schema version of the document being extracted, for extractors that
/// branch on it. Opaque to the framework.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FormatVersion(pub u64);

/// The generic context shared by every formats-driven operation: the
/// registry handle plus opaque pass-through data.
pub struct FormatContext<'a> {
    formats:   &'a Formats,
    version:   Option<FormatVersion>,
    user_data: Option<&'a (dyn Any + Send + Sync)>,
}

impl<'a> FormatContext<'a> {
    /// Create a base context over `formats` with no version or user data.
    #[must_use]
    pub const fn new(formats: &'a Formats) -> Self {
        Self {
            formats,
            version: None,
            user_data: None,
        }
    }

    /// The registry this operation resolves extractors from.
    #[must_use]
    pub const fn formats(&self) -> &'a Formats {
        self.formats
    }

    /// The document schema version, when the caller supplied one.
    #[must_use]
    pub const fn version(&self) -> Option<FormatVersion> {
        self.version
    }

    /// Caller-supplied opaque data, passed through to extractors.
    #[must_use]
    pub const fn user_data(&self) -> Option<&'a (dyn Any + Send + Sync)> {
        self.user_data
    }
}

/// The orchestrator for one top-level extraction call.
///
/// Owns the options, the registry handle, the current structural path, and
/// the accumulated problem list. One context is threaded through the whole
/// call tree: narrowing operations extend the path for the duration of the
/// nested call and restore it on exit, so problem accounting is tree-wide
/// and path extension never copies the context.
///
/// ```
/// use quarry::Formats;
/// use quarry::extraction::ExtractionContext;
/// use quarry::path::JsonPath;
/// use serde_json::json;
///
/// let formats = Formats::with_defaults();
/// let doc = json!({ "i": 5 });
/// let value: i64 = ExtractionContext::new(&formats)
///     .extract_sub(&doc, JsonPath::key("i"))
///     .expect("well-formed field");
/// assert_eq!(value, 5);
/// ```
pub struct ExtractionContext<'a> {
    base:     FormatContext<'a>,
    options:  ExtractOptions,
    path:     JsonPath,
    problems: Vec<Problem>,
}

impl<'a> ExtractionContext<'a> {
    /// Create a context over `formats` with default [`ExtractOptions`].
    #[must_use]
    pub const fn new(formats: &'a Formats) -> Self {
        Self {
            base:     FormatContext::new(formats),
            options:  ExtractOptions::new(),
            path:     JsonPath::root(),
            problems: Vec::new(),
        }
    }

    /// Return this context configured with `options`.
    #[must_use]
    pub const fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Return this context carrying a document schema `version`.
    #[must_use]
    pub const fn with_version(mut self, version: FormatVersion) -> Self {
        self.base.version = Some(version);
        self
    }

    /// Return this context carrying opaque `user_data` for extractors.
    #[must_use]
    pub const fn with_user_data(mut self, user_data: &'a (dyn Any + Send + Sync)) -> Self {
        self.base.user_data = Some(user_data);
        self
    }

    /// The registry this operation resolves extractors from.
    #[must_use]
    pub const fn formats(&self) -> &'a Formats {
        self.base.formats()
    }

    /// The options governing this operation.
    #[must_use]
    pub const fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// The document schema version, when the caller supplied one.
    #[must_use]
    pub const fn version(&self) -> Option<FormatVersion> {
        self.base.version()
    }

    /// Caller-supplied opaque data.
    #[must_use]
    pub const fn user_data(&self) -> Option<&'a (dyn Any + Send + Sync)> {
        self.base.user_data()
    }

    /// The structural path of the node currently being extracted.
    #[must_use]
    pub const fn current_path(&self) -> &JsonPath {
        &self.path
    }

    /// Problems collected so far in this operation.
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Note that a problem has been encountered at the current path.
    ///
    /// Under [`FailureMode::FailImmediately`] this raises an
    /// [`ExtractionError`] wrapping the problem. Under
    /// [`FailureMode::CollectAll`] the problem is recorded and extraction
    /// continues until `max_failures` is reached, at which point the error
    /// wraps every collected problem.
    ///
    /// When this returns `Ok`, the outcome is always
    /// [`Extraction::Failed`], so extractor failure paths are the single
    /// expression `return cx.problem(..)`.
    pub fn problem(&mut self, message: impl Into<String>) -> ExtractResult {
        let problem = Problem::new(self.path.clone(), message);
        self.record(problem)
    }

    /// Like [`ExtractionContext::problem`], additionally capturing the
    /// underlying `cause`.
    pub fn problem_with_cause(
        &mut self,
        message: impl Into<String>,
        cause: impl Into<Cause>,
    ) -> ExtractResult {
        let problem = Problem::with_cause(self.path.clone(), message, cause);
        self.record(problem)
    }

    /// Like [`ExtractionContext::problem`], reported at an explicit `path`
    /// instead of the current one.
    pub fn problem_at(&mut self, path: JsonPath, message: impl Into<String>) -> ExtractResult {
        let problem = Problem::new(path, message);
        self.record(problem)
    }

    fn record(&mut self, problem: Problem) -> ExtractResult {
        debug!(path = %problem.path(), message = problem.message(), "extraction problem");
        match self.options.failure_mode() {
            FailureMode::FailImmediately => Err(ExtractionError::new(vec![problem])),
            FailureMode::CollectAll => {
                if self.problems.is_empty() {
                    // First problem: reserve the bound up front so the list
                    // never reallocates while collecting.
                    self.problems.reserve(self.options.max_failures());
                }
                self.problems.push(problem);
                if self.problems.len() >= self.options.max_failures() {
                    Err(ExtractionError::new(std::mem::take(&mut self.problems)))
                } else {
                    Ok(Extraction::Failed)
                }
            }
        }
    }

    /// Type-erased dispatch primitive: resolve the extractor registered for
    /// `key` and invoke it on `node`.
    ///
    /// An unregistered type is a hard failure at the current path. This is
    /// the single non-generic seam the registry is written against; typed
    /// callers go through [`ExtractionContext::try_extract`] or the
    /// consuming entry points.
    pub fn extract_erased(&mut self, key: TypeKey, node: &Value) -> ExtractResult {
        let formats = self.base.formats;
        formats.extract(key, node, self)
    }

    /// Narrowing dispatch primitive: extend the current path by `subpath`,
    /// resolve the sub-node, and extract `key` from it.
    ///
    /// A path that does not resolve is a hard failure attributed to the
    /// extended path, as is everything raised by the nested extraction --
    /// this is how diagnostics accumulate a dotted/bracketed location
    /// through nested structures.
    pub fn extract_sub_erased(
        &mut self,
        key: TypeKey,
        root: &Value,
        subpath: &JsonPath,
    ) -> ExtractResult {
        let depth = self.path.len();
        self.path.extend(subpath.iter().cloned());
        trace!(path = %self.path, ty = key.name(), "narrowing");
        let outcome = match root.at_path(subpath) {
            Ok(node) => self.extract_erased(key, node),
            Err(resolve_error) => Err(ExtractionError::caused_by(
                self.path.clone(),
                resolve_error,
            )),
        };
        self.path.truncate(depth);
        outcome
    }

    /// Extract a `T` from `node`, for use *inside* extractors.
    ///
    /// Returns `Ok(Some(value))` on success and `Ok(None)` on a soft
    /// failure (problems already recorded), letting the calling extractor
    /// continue with sibling fields under [`FailureMode::CollectAll`] or
    /// substitute a recovery value. Hard failures propagate as `Err`.
    pub fn try_extract<T: Any + Send>(&mut self, node: &Value) -> Result<Option<T>> {
        let outcome = self.extract_erased(TypeKey::of::<T>(), node)?;
        downcast(outcome, || self.path.clone())
    }

    /// Extract a `T` from `root.at_path(subpath)`, for use *inside*
    /// extractors. Soft-failure semantics as
    /// [`ExtractionContext::try_extract`].
    pub fn try_extract_sub<T: Any + Send>(
        &mut self,
        root: &Value,
        subpath: impl Into<JsonPath>,
    ) -> Result<Option<T>> {
        let subpath = subpath.into();
        let outcome = self.extract_sub_erased(TypeKey::of::<T>(), root, &subpath)?;
        downcast(outcome, || self.path.join(&subpath))
    }

    /// Extract a `T` from `node`: the top-level typed entry point.
    ///
    /// Consumes the context. Succeeds only when the whole call tree
    /// recorded *zero* problems; an extraction that produced a value but
    /// recorded problems along the way returns the accumulated
    /// [`ExtractionError`] instead of a partially-trusted value.
    pub fn extract<T: Any + Send>(mut self, node: &Value) -> Result<T> {
        let value = self.try_extract::<T>(node)?;
        self.finish(value)
    }

    /// Extract a `T` from `root.at_path(subpath)`: the top-level narrowing
    /// entry point. Success semantics as [`ExtractionContext::extract`].
    pub fn extract_sub<T: Any + Send>(
        mut self,
        root: &Value,
        subpath: impl Into<JsonPath>,
    ) -> Result<T> {
        let value = self.try_extract_sub::<T>(root, subpath)?;
        self.finish(value)
    }

    fn finish<T>(mut self, value: Option<T>) -> Result<T> {
        if !self.problems.is_empty() {
            return Err(ExtractionError::new(std::mem::take(&mut self.problems)));
        }
        // A `Failed` outcome with no recorded problems violates the
        // extractor contract; surface the non-empty invariant's synthetic
        // entry rather than trusting it.
        value.map_or_else(|| Err(ExtractionError::new(Vec::new())), Ok)
    }
}

fn downcast<T: Any + Send>(
    outcome: Extraction,
    at: impl FnOnce() -> JsonPath,
) -> Result<Option<T>> {
    match outcome {
        Extraction::Failed => Ok(None),
        Extraction::Value(boxed) => match boxed.downcast::<T>() {
            Ok(value) => Ok(Some(*value)),
            Err(_) => Err(ExtractionError::at(
                at(),
                format!(
                    "extractor registered for `{}` produced a value of a different type",
                    type_name::<T>()
                ),
            )),
        },
    }
}
