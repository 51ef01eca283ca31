//! Boolean collection comparisons and error expectations for tests.

use std::{fmt, hash::Hash};

use tracing::debug;

use crate::{count::Frequencies, ErrorMismatch};

/// Reports whether `lhs` and `rhs` hold the same elements with the same
/// multiplicities, in any order.
///
/// ```
/// # use jt_core::compare::equals_unordered;
/// assert!(equals_unordered(&[1, 2, 2, 3, 3, 3], &[3, 3, 3, 2, 2, 1]));
/// assert!(!equals_unordered(&[1, 2, 3], &[1, 2, 3, 4]));
/// ```
#[must_use]
pub fn equals_unordered<T>(lhs: &[T], rhs: &[T]) -> bool
where
    T: Eq + Hash,
{
    if lhs.len() != rhs.len() {
        debug!(lhs = lhs.len(), rhs = rhs.len(), "collections differ in length");
        return false;
    }

    let mut counts = Frequencies::of(lhs);
    for (index, item) in rhs.iter().enumerate() {
        if !counts.take(item) {
            debug!(index, "element has no remaining counterpart");
            return false;
        }
    }
    // Equal lengths and no failed take leave every count at zero.
    true
}

/// Reports whether `lhs` and `rhs` are equal element by element.
///
/// ```
/// # use jt_core::compare::equals_ordered;
/// assert!(equals_ordered(&["a", "b"], &["a", "b"]));
/// assert!(!equals_ordered(&["a", "b"], &["b", "a"]));
/// ```
#[must_use]
pub fn equals_ordered<T>(lhs: &[T], rhs: &[T]) -> bool
where
    T: PartialEq,
{
    if lhs.len() != rhs.len() {
        return false;
    }
    match lhs.iter().zip(rhs).position(|(a, b)| a != b) {
        Some(index) => {
            debug!(index, "collections differ at position");
            false
        }
        None => true,
    }
}

/// Checks that an operation failed with the expected error, or succeeded
/// when none was expected.
///
/// Errors are compared with `PartialEq`, never by their rendered messages;
/// the messages only appear in the returned [`ErrorMismatch`].
///
/// ```
/// # use jt_core::{compare, AccessError, Document, ErrorMismatch};
/// let doc = Document::from_json_str(r#"{"value":true}"#)?;
/// let outcome = doc.check("value.othervalue");
/// assert_eq!(compare::errors(Some(&AccessError::PathIndexFailed), outcome.err().as_ref()), Ok(()));
///
/// let mismatch = compare::errors(None, Some(&AccessError::PropertyNotFound)).unwrap_err();
/// assert_eq!(mismatch.to_string(), "got unexpected error: json path does not exist");
/// # Ok::<(), jt_core::DecodeError>(())
/// ```
pub fn errors<E>(expected: Option<&E>, actual: Option<&E>) -> Result<(), ErrorMismatch>
where
    E: PartialEq + fmt::Display + ?Sized,
{
    match (expected, actual) {
        (None, None) => Ok(()),
        (None, Some(actual)) => Err(ErrorMismatch::Unexpected { actual: actual.to_string() }),
        (Some(expected), None) => Err(ErrorMismatch::Missing { expected: expected.to_string() }),
        (Some(expected), Some(actual)) if expected == actual => Ok(()),
        (Some(expected), Some(actual)) => Err(ErrorMismatch::Different {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
    }
}
