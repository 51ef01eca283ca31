//! Diagnostic differences between unordered collections.

use std::{error::Error, fmt, hash::Hash};

use tracing::debug;

use crate::count::Frequencies;

/// The elements two collections do not share, counting duplicates.
///
/// Rendered as `values only in A: ...; values only in B: ...`, leaving out
/// the clause (and the separator) for an empty side.
///
/// ```
/// # use jt_core::diff::MultisetDiff;
/// let diff = MultisetDiff::new(vec!["a", "b"], vec![]);
/// assert_eq!(diff.to_string(), "values only in A: a, b");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisetDiff<T> {
    only_in_a: Vec<T>,
    only_in_b: Vec<T>,
}

impl<T> MultisetDiff<T> {
    /// Builds a diff from its two sides.
    #[must_use]
    pub fn new(only_in_a: Vec<T>, only_in_b: Vec<T>) -> Self {
        Self { only_in_a, only_in_b }
    }

    /// Elements of A without a counterpart in B, in A's order.
    #[must_use]
    pub fn only_in_a(&self) -> &[T] {
        &self.only_in_a
    }

    /// Elements of B without a counterpart in A, grouped by first appearance
    /// in B.
    #[must_use]
    pub fn only_in_b(&self) -> &[T] {
        &self.only_in_b
    }

    /// Indicates whether both sides are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.only_in_a.is_empty() && self.only_in_b.is_empty()
    }

    /// Consumes the diff, returning `(only_in_a, only_in_b)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Vec<T>) {
        (self.only_in_a, self.only_in_b)
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl<T: fmt::Display> fmt::Display for MultisetDiff<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.only_in_a.is_empty() {
            f.write_str("values only in A: ")?;
            write_joined(f, &self.only_in_a)?;
        }
        if !self.only_in_a.is_empty() && !self.only_in_b.is_empty() {
            f.write_str("; ")?;
        }
        if !self.only_in_b.is_empty() {
            f.write_str("values only in B: ")?;
            write_joined(f, &self.only_in_b)?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug + fmt::Display> Error for MultisetDiff<T> {}

/// Computes what `a` and `b` do not have in common, ignoring positions.
///
/// Returns `Ok(())` when the collections hold the same elements with the same
/// multiplicities. An element occurring `m` times in `a` and `n` times in `b`
/// contributes `m - n` copies to the A side when `m > n` and `n - m` copies to
/// the B side when `n > m`.
///
/// ```
/// # use jt_core::diff::diff;
/// let err = diff(&[1, 2, 2, 3, 3, 3], &[1, 2, 3]).unwrap_err();
/// assert_eq!(err.only_in_a(), [2, 3, 3]);
/// assert!(err.only_in_b().is_empty());
/// assert_eq!(err.to_string(), "values only in A: 2, 3, 3");
///
/// assert!(diff(&["a", "b"], &["b", "a"]).is_ok());
/// ```
pub fn diff<T>(a: &[T], b: &[T]) -> Result<(), MultisetDiff<T>>
where
    T: Eq + Hash + Clone,
{
    let mut counts = Frequencies::of(b);
    let mut only_in_a = Vec::new();
    for item in a {
        if !counts.take(item) {
            only_in_a.push(item.clone());
        }
    }

    let mut only_in_b = Vec::new();
    for (item, remaining) in counts.remaining() {
        only_in_b.extend(std::iter::repeat_n(item, remaining).cloned());
    }

    if only_in_a.is_empty() && only_in_b.is_empty() {
        return Ok(());
    }
    debug!(only_in_a = only_in_a.len(), only_in_b = only_in_b.len(), "collections differ");
    Err(MultisetDiff::new(only_in_a, only_in_b))
}
