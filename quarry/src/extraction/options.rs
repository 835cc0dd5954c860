//! Per-operation extraction configuration.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Default value for [`ExtractOptions::max_failures`].
pub const DEFAULT_MAX_FAILURES: usize = 10;

/// When a problem is encountered during extraction, what should happen?
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureMode {
    /// Raise an [`ExtractionError`] on the first problem -- do not attempt
    /// to continue.
    ///
    /// [`ExtractionError`]: crate::error::ExtractionError
    #[default]
    FailImmediately,
    /// Attempt to continue extraction, collecting problems and failing once
    /// [`ExtractOptions::max_failures`] is reached.
    CollectAll,
}

/// When an object key has the same value as a previously-seen key, what
/// should happen?
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DuplicateKeyAction {
    /// Keep the last-encountered value: `{"a":1,"a":2,"a":3}` ends as
    /// `{"a":3}`.
    #[default]
    Replace,
    /// Keep the first-encountered value: `{"a":1,"a":2,"a":3}` ends as
    /// `{"a":1}`.
    Ignore,
    /// Repeated keys fail object assembly with a
    /// [`DuplicateKeyError`].
    ///
    /// [`DuplicateKeyError`]: crate::value::DuplicateKeyError
    Error,
}

/// Configuration for a single extraction operation.
///
/// A plain value object with three independent knobs. Immutable in use:
/// the fluent setters consume and return the configuration, builder style.
///
/// ```
/// use quarry::extraction::{ExtractOptions, FailureMode};
///
/// let options = ExtractOptions::default()
///     .with_failure_mode(FailureMode::CollectAll)
///     .with_max_failures(3);
/// assert_eq!(options.max_failures(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ExtractOptions {
    failure_mode:     FailureMode,
    max_failures:     usize,
    on_duplicate_key: DuplicateKeyAction,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Create the default set of options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            failure_mode:     FailureMode::FailImmediately,
            max_failures:     DEFAULT_MAX_FAILURES,
            on_duplicate_key: DuplicateKeyAction::Replace,
        }
    }

    /// The active failure mode. Defaults to
    /// [`FailureMode::FailImmediately`].
    #[must_use]
    pub const fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Return these options with `mode` as the failure mode.
    #[must_use]
    pub const fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// The maximum number of problems collected before extraction fails.
    /// Only consulted under [`FailureMode::CollectAll`]. Defaults to
    /// [`DEFAULT_MAX_FAILURES`].
    #[must_use]
    pub const fn max_failures(&self) -> usize {
        self.max_failures
    }

    /// Return these options with `limit` as the failure bound.
    ///
    /// The bound is a positive count; `0` is treated as `1`. Keep it
    /// reasonable -- every collected problem stays in memory until the
    /// operation ends.
    #[must_use]
    pub fn with_max_failures(mut self, limit: usize) -> Self {
        self.max_failures = limit.max(1);
        self
    }

    /// How repeated object keys are resolved during document assembly.
    /// Defaults to [`DuplicateKeyAction::Replace`].
    #[must_use]
    pub const fn on_duplicate_key(&self) -> DuplicateKeyAction {
        self.on_duplicate_key
    }

    /// Return these options with `action` as the duplicate-key policy.
    #[must_use]
    pub const fn with_on_duplicate_key(mut self, action: DuplicateKeyAction) -> Self {
        self.on_duplicate_key = action;
        self
    }
}
