//! Structural paths into JSON documents.
//!
//! A [`JsonPath`] is an ordered sequence of [`PathElement`]s, each naming an
//! object key or an array index. Paths render in the dotted/bracketed form
//! used throughout extraction diagnostics (e.g. `.items[2].name`) and parse
//! back from the same grammar via [`FromStr`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One step into a JSON document: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// An object member, addressed by key.
    Key(String),
    /// An array element, addressed by zero-based index.
    Index(usize),
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, ".{key}"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for PathElement {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathElement {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathElement {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Error produced when parsing a path expression fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// An opening `[` with no matching `]`.
    #[error("unterminated array index at offset {offset}")]
    UnterminatedIndex {
        /// Byte offset of the opening bracket.
        offset: usize,
    },
    /// Bracket contents that are not a non-negative integer.
    #[error("invalid array index `{text}` at offset {offset}")]
    InvalidIndex {
        /// The text found between the brackets.
        text:   String,
        /// Byte offset of the opening bracket.
        offset: usize,
    },
    /// A `.` followed by another `.`, a `[`, or the end of input.
    #[error("empty key at offset {offset}")]
    EmptyKey {
        /// Byte offset of the dot introducing the empty key.
        offset: usize,
    },
}

/// An ordered sequence of path elements identifying a location within a JSON
/// document.
///
/// The empty path refers to the document root and renders as `.`.
///
/// ```
/// use quarry::path::JsonPath;
///
/// let path: JsonPath = ".items[2].name".parse().expect("valid path");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), ".items[2].name");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPath {
    elements: Vec<PathElement>,
}

impl JsonPath {
    /// The empty path, referring to the document root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// A single-element path addressing the object member `key`.
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::from(PathElement::Key(key.into()))
    }

    /// A single-element path addressing array element `index`.
    #[must_use]
    pub fn index(index: usize) -> Self {
        Self::from(PathElement::Index(index))
    }

    /// Number of elements in this path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// `true` for the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The elements of this path, in order from the root.
    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Append one element.
    pub fn push(&mut self, element: impl Into<PathElement>) {
        self.elements.push(element.into());
    }

    /// Shorten this path to `len` elements. No-op if already shorter.
    pub fn truncate(&mut self, len: usize) {
        self.elements.truncate(len);
    }

    /// This path followed by all elements of `other`.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        let mut joined = self.clone();
        joined
            .elements
            .extend(other.elements.iter().cloned());
        joined
    }

    /// Iterate over the elements from the root.
    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.elements.iter()
    }
}

impl From<PathElement> for JsonPath {
    fn from(element: PathElement) -> Self {
        Self {
            elements: vec![element],
        }
    }
}

impl From<usize> for JsonPath {
    fn from(index: usize) -> Self {
        Self::index(index)
    }
}

impl From<&str> for JsonPath {
    /// A single-element path addressing the object member `key`. The string
    /// is taken literally, not parsed; use [`FromStr`] for the dotted
    /// grammar.
    fn from(key: &str) -> Self {
        Self::key(key)
    }
}

impl From<String> for JsonPath {
    /// A single-element path addressing the object member `key`.
    fn from(key: String) -> Self {
        Self::key(key)
    }
}

impl From<Vec<PathElement>> for JsonPath {
    fn from(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }
}

impl Extend<PathElement> for JsonPath {
    fn extend<I: IntoIterator<Item = PathElement>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

impl<'a> IntoIterator for &'a JsonPath {
    type IntoIter = std::slice::Iter<'a, PathElement>;
    type Item = &'a PathElement;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for JsonPath {
    type IntoIter = std::vec::IntoIter<PathElement>;
    type Item = PathElement;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elements.is_empty() {
            return f.write_str(".");
        }
        for element in &self.elements {
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

impl FromStr for JsonPath {
    type Err = PathParseError;

    /// Parse the dotted/bracketed grammar: `.a.b[3]`, `a.b[3]`, `[0].x`.
    ///
    /// The empty string and a lone `.` both parse to the root path. Keys
    /// containing `.` or `[` cannot be written in this grammar; build such
    /// paths with [`JsonPath::key`] and [`JsonPath::push`] instead.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut elements = Vec::new();
        let bytes = input.as_bytes();
        let mut offset = 0;

        if input == "." {
            return Ok(Self::root());
        }

        while offset < bytes.len() {
            match bytes[offset] {
                b'[' => {
                    let close = input[offset..]
                        .find(']')
                        .map(|at| offset + at)
                        .ok_or(PathParseError::UnterminatedIndex { offset })?;
                    let text = &input[offset + 1..close];
                    let index: usize =
                        text.parse()
                            .map_err(|_| PathParseError::InvalidIndex {
                                text: text.to_string(),
                                offset,
                            })?;
                    elements.push(PathElement::Index(index));
                    offset = close + 1;
                }
                other => {
                    // A key segment, introduced by an optional leading dot.
                    let start = if other == b'.' { offset + 1 } else { offset };
                    let end = input[start..]
                        .find(['.', '['])
                        .map_or(bytes.len(), |at| start + at);
                    if start == end {
                        return Err(PathParseError::EmptyKey { offset });
                    }
                    elements.push(PathElement::Key(input[start..end].to_string()));
                    offset = end;
                }
            }
        }

        Ok(Self { elements })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_parse_dotted_and_bracketed() {
        let path: JsonPath = ".a.b[2].c".parse().unwrap();
        assert_eq!(
            path.elements(),
            &[
                PathElement::Key("a".to_string()),
                PathElement::Key("b".to_string()),
                PathElement::Index(2),
                PathElement::Key("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_without_leading_dot() {
        let path: JsonPath = "a.b".parse().unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.to_string(), ".a.b");
    }

    #[test]
    fn test_parse_index_first() {
        let path: JsonPath = "[0].x".parse().unwrap();
        assert_eq!(path.to_string(), "[0].x");
    }

    #[test]
    fn test_parse_root_forms() {
        assert_eq!("".parse::<JsonPath>().unwrap(), JsonPath::root());
        assert_eq!(".".parse::<JsonPath>().unwrap(), JsonPath::root());
    }

    #[test]
    fn test_root_renders_as_dot() {
        assert_eq!(JsonPath::root().to_string(), ".");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "[1x]".parse::<JsonPath>(),
            Err(PathParseError::InvalidIndex {
                text:   "1x".to_string(),
                offset: 0,
            })
        );
        assert_eq!(
            ".a[3".parse::<JsonPath>(),
            Err(PathParseError::UnterminatedIndex { offset: 2 })
        );
        assert_eq!(
            ".a..b".parse::<JsonPath>(),
            Err(PathParseError::EmptyKey { offset: 2 })
        );
    }

    #[test]
    fn test_push_truncate_scoping() {
        let mut path = JsonPath::key("items");
        let depth = path.len();
        path.push(2_usize);
        path.push("name");
        assert_eq!(path.to_string(), ".items[2].name");
        path.truncate(depth);
        assert_eq!(path.to_string(), ".items");
    }

    #[test]
    fn test_single_element_conversions() {
        assert_eq!(JsonPath::from("a.b").to_string(), ".a.b"); // literal key
        assert_eq!(JsonPath::from("a.b").len(), 1);
        assert_eq!(JsonPath::from(3_usize).to_string(), "[3]");
    }

    #[test]
    fn test_join() {
        let base: JsonPath = ".a".parse().unwrap();
        let sub: JsonPath = "[3]".parse().unwrap();
        assert_eq!(base.join(&sub).to_string(), ".a[3]");
    }

    #[test]
    fn test_display_parse_round_trip() {
        for text in [".a.b[2]", "[0]", ".key[10][11].x"] {
            let path: JsonPath = text.parse().unwrap();
            assert_eq!(path.to_string(), text);
        }
    }
}
