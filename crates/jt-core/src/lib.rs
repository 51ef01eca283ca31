//! Assertion helpers for tests that inspect JSON and YAML payloads.
//!
//! `jt-core` offers two tools. [`Document`] walks a decoded payload along
//! dotted property paths with type-checked extraction, distinguishing a path
//! that does not exist from one that runs into a primitive. The [`compare`]
//! and [`diff`] modules compare unordered collections as multisets and
//! explain mismatches in a form suitable for test output.
//!
//! ```
//! use jt_core::{diff, AccessError, Document, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let doc = Document::from_json_str(r#"{"user":{"name":"ada","tags":["b","a","a"]}}"#)?;
//!     assert_eq!(doc.get_str("user.name")?, "ada");
//!     assert_eq!(doc.get_str("user.name.first"), Err(AccessError::PathIndexFailed));
//!
//!     let tags = doc.get_array("user.tags")?;
//!     let expected = [Value::from("a"), Value::from("b")];
//!     let report = diff(tags, &expected).unwrap_err();
//!     assert_eq!(report.to_string(), "values only in A: a");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod compare;
mod count;
pub mod diff;
mod document;
mod error;
mod extract;
mod options;
mod path;
mod value;

pub use compare::{equals_ordered, equals_unordered};
pub use diff::{diff, MultisetDiff};
pub use document::Document;
pub use error::{AccessError, DecodeError, ErrorMismatch, KeyFailure, MissingKeys};
pub use extract::Extract;
pub use options::{DecodeOptions, NumberMode};
pub use path::Path;
pub use value::{Value, ValueKind};

/// Returns the semantic version of the `jt-core` crate.
///
/// ```
/// assert!(!jt_core::version().is_empty());
/// ```
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
