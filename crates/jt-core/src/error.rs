use std::fmt;

use thiserror::Error;

use crate::ValueKind;

/// Errors produced while resolving a path or narrowing the value found there.
///
/// The two resolution failures are deliberately distinct: [`PropertyNotFound`]
/// means the path does not exist in the document, while [`PathIndexFailed`]
/// means a prefix of the path exists but holds a value that cannot be indexed
/// any further.
///
/// ```
/// # use jt_core::{AccessError, ValueKind};
/// let err = AccessError::TypeMismatch { wanted: ValueKind::Int64, actual: ValueKind::Float64 };
/// assert_eq!(err.to_string(), "attempted to type float64 as int64");
/// ```
///
/// [`PropertyNotFound`]: AccessError::PropertyNotFound
/// [`PathIndexFailed`]: AccessError::PathIndexFailed
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// A mapping along the path lacks the requested key.
    #[error("json path does not exist")]
    PropertyNotFound,
    /// A segment tried to index through a value that is not a mapping.
    #[error("cannot index into non-map type")]
    PathIndexFailed,
    /// The path resolved, but to a value of another kind.
    #[error("attempted to type {actual} as {wanted}")]
    TypeMismatch {
        /// The kind the caller asked for.
        wanted: ValueKind,
        /// The kind actually stored at the path.
        actual: ValueKind,
    },
}

/// A single failing path collected by [`Document::has_all_keys`](crate::Document::has_all_keys).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFailure {
    /// The path expression as given by the caller.
    pub path: String,
    /// Why the path failed to resolve.
    pub error: AccessError,
}

impl fmt::Display for KeyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

/// Aggregate failure reporting every path that did not resolve, one per line.
///
/// ```
/// # use jt_core::Document;
/// let doc = Document::from_json_str(r#"{"a":{"b":1}}"#)?;
/// let err = doc.has_all_keys(["a.b", "a.c", "a.b.c"]).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "a.c: json path does not exist\na.b.c: cannot index into non-map type"
/// );
/// # Ok::<(), jt_core::DecodeError>(())
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{}", render_failures(.failures))]
pub struct MissingKeys {
    failures: Vec<KeyFailure>,
}

impl MissingKeys {
    pub(crate) fn new(failures: Vec<KeyFailure>) -> Self {
        Self { failures }
    }

    /// Returns the individual failures in the order the paths were given.
    #[must_use]
    pub fn failures(&self) -> &[KeyFailure] {
        &self.failures
    }

    /// Number of failing paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Always `false` for values produced by the library.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

fn render_failures(failures: &[KeyFailure]) -> String {
    failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}

/// Errors that can occur while decoding external data into a [`Document`](crate::Document).
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The provided JSON input was invalid.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The provided YAML input was invalid.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The payload decoded fine but its root is not a mapping.
    #[error("expected an object at the document root, found {found}")]
    NotAnObject {
        /// The kind of the root value.
        found: ValueKind,
    },
    /// Encountered a number that cannot be represented as `f64` or `i64`.
    #[error("number {value} cannot be represented")]
    NumberOutOfRange {
        /// The textual representation of the offending number.
        value: String,
    },
    /// YAML maps may only contain string keys.
    #[error("unsupported YAML key type: {found}")]
    NonStringYamlKey {
        /// A description of the key that triggered the error.
        found: String,
    },
    /// Tagged YAML values have no counterpart in the document model.
    #[error("unsupported YAML tag: {tag}")]
    UnsupportedYamlTag {
        /// The tag identifier encountered in the document.
        tag: String,
    },
}

/// Produced by [`compare::errors`](crate::compare::errors) when the error a
/// test received is not the one it expected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ErrorMismatch {
    /// No error was expected, but one occurred.
    #[error("got unexpected error: {actual}")]
    Unexpected {
        /// Rendered form of the error received.
        actual: String,
    },
    /// An error was expected, but the operation succeeded.
    #[error("wanted err {expected}, but got none")]
    Missing {
        /// Rendered form of the error expected.
        expected: String,
    },
    /// A different error than the expected one occurred.
    #[error("wanted err {expected}; got {actual}")]
    Different {
        /// Rendered form of the error expected.
        expected: String,
        /// Rendered form of the error received.
        actual: String,
    },
}
