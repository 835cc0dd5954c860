//! Extraction failure reporting.
//!
//! Every failure that crosses the extraction boundary is an
//! [`ExtractionError`]: a non-empty, ordered collection of [`Problem`]s, each
//! carrying the structural path it was observed at, a human-readable message,
//! and optionally the underlying error that caused it.

use std::error::Error as StdError;
use std::fmt;

use crate::path::JsonPath;

/// Result type for the `quarry` library.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Boxed underlying cause carried by a [`Problem`].
pub type Cause = Box<dyn StdError + Send + Sync + 'static>;

const UNKNOWN_PROBLEM: &str = "Unknown problem";
const UNSPECIFIED_PROBLEM: &str = "Unspecified problem";

/// Description of a single problem with extraction: where it happened, what
/// went wrong, and (when available) the underlying error.
///
/// Immutable once created. An empty message is replaced with
/// `"Unknown problem"` so rendered diagnostics never trail off into nothing.
#[derive(Debug)]
pub struct Problem {
    path:    JsonPath,
    message: String,
    cause:   Option<Cause>,
}

impl Problem {
    /// Create a problem at `path` with the given `message`.
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = UNKNOWN_PROBLEM.to_string();
        }
        Self {
            path,
            message,
            cause: None,
        }
    }

    /// Create a problem at `path` with both a `message` and the underlying
    /// `cause`.
    pub fn with_cause(path: JsonPath, message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        let mut problem = Self::new(path, message);
        problem.cause = Some(cause.into());
        problem
    }

    /// Create a problem at `path` whose message is taken from the `Display`
    /// rendering of `cause`.
    pub fn from_cause(path: JsonPath, cause: impl Into<Cause>) -> Self {
        let cause = cause.into();
        Self::with_cause(path, cause.to_string(), cause)
    }

    /// The path this problem was encountered at.
    #[must_use]
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// Human-readable details about the encountered problem. Never empty.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying error that caused this problem, when one was captured.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}: {}", self.path, self.message)
    }
}

/// The error raised across the extraction boundary.
///
/// Carries one problem under fail-fast (or for any hard failure) and up to
/// `max_failures` problems when collecting. The problem list is never empty:
/// constructing from an empty collection substitutes a single synthetic
/// `"Unspecified problem"` entry rather than failing.
#[derive(Debug)]
pub struct ExtractionError {
    problems: Vec<Problem>,
}

impl ExtractionError {
    /// Create an error from the given list of problems.
    ///
    /// An empty `problems` list is replaced by one synthetic entry at the
    /// root path.
    #[must_use]
    pub fn new(mut problems: Vec<Problem>) -> Self {
        if problems.is_empty() {
            problems.push(Problem::new(JsonPath::root(), UNSPECIFIED_PROBLEM));
        }
        Self { problems }
    }

    /// Create a single-problem error at `path` with the given `message`.
    pub fn at(path: JsonPath, message: impl Into<String>) -> Self {
        Self::new(vec![Problem::new(path, message)])
    }

    /// Create a single-problem error at `path` from an underlying `cause`.
    pub fn caused_by(path: JsonPath, cause: impl Into<Cause>) -> Self {
        Self::new(vec![Problem::from_cause(path, cause)])
    }

    /// The path the first (primary) problem came from.
    #[must_use]
    pub fn path(&self) -> &JsonPath {
        self.problems[0].path()
    }

    /// The first problem's underlying cause, when one was captured.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.problems[0].cause()
    }

    /// All problems which caused this error. Always at least one.
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.problems.len() == 1 {
            write!(f, "Extraction error {}", self.problems[0])
        } else {
            write!(f, "{} extraction errors:", self.problems.len())?;
            for problem in &self.problems {
                write!(f, "\n - {problem}")?;
            }
            Ok(())
        }
    }
}

impl StdError for ExtractionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.problems[0]
            .cause
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::value::PathResolveError;

    fn path(text: &str) -> JsonPath {
        text.parse().expect("valid path")
    }

    #[test]
    fn test_empty_message_is_substituted() {
        let problem = Problem::new(path(".a"), "");
        assert_eq!(problem.message(), "Unknown problem");
    }

    #[test]
    fn test_from_cause_takes_message_from_display() {
        let cause = PathResolveError::MissingKey {
            key: "b".to_string(),
        };
        let problem = Problem::from_cause(path(".a"), cause);
        assert_eq!(problem.message(), "missing key `b` in object");
        assert!(problem.cause().is_some());
    }

    #[test]
    fn test_empty_problem_list_yields_synthetic_entry() {
        let error = ExtractionError::new(Vec::new());
        assert_eq!(error.problems().len(), 1);
        assert_eq!(error.problems()[0].message(), "Unspecified problem");
        assert!(error.path().is_empty());
    }

    #[test]
    fn test_single_problem_rendering() {
        let error = ExtractionError::at(path(".a.b[2]"), "expected a number, found string");
        assert_eq!(
            error.to_string(),
            "Extraction error at .a.b[2]: expected a number, found string"
        );
    }

    #[test]
    fn test_multi_problem_rendering() {
        let error = ExtractionError::new(vec![
            Problem::new(path(".a"), "first"),
            Problem::new(path(".b[1]"), "second"),
        ]);
        assert_eq!(
            error.to_string(),
            "2 extraction errors:\n - at .a: first\n - at .b[1]: second"
        );
    }

    #[test]
    fn test_primary_accessors_report_first_problem() {
        let cause = PathResolveError::MissingKey {
            key: "x".to_string(),
        };
        let error = ExtractionError::new(vec![
            Problem::from_cause(path(".first"), cause),
            Problem::new(path(".second"), "later"),
        ]);
        assert_eq!(error.path().to_string(), ".first");
        assert!(error.cause().is_some());
    }

    #[test]
    fn test_source_is_first_cause() {
        let error = ExtractionError::caused_by(
            path(".a"),
            PathResolveError::MissingKey {
                key: "k".to_string(),
            },
        );
        let source = StdError::source(&error).expect("source present");
        assert_eq!(source.to_string(), "missing key `k` in object");
    }
}
