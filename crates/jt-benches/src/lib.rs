//! Synthetic workloads for the `jt` Criterion benchmarks.
//!
//! Each [`Corpus`] deterministically builds a nested [`Document`] for path
//! resolution and a pair of collections for the multiset comparisons, so the
//! benchmarks need no fixture files.
//!
//! # Examples
//!
//! ```
//! let corpus = &jt_benches::available_corpora()[0];
//! let doc = corpus.document();
//! assert!(doc.resolve(&corpus.deepest_path()).is_ok());
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use jt_core::{Document, Path, Value};

/// A named workload shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corpus {
    name: &'static str,
    width: usize,
    depth: usize,
    items: usize,
}

const CORPORA: &[Corpus] = &[
    Corpus { name: "small", width: 4, depth: 3, items: 64 },
    Corpus { name: "wide", width: 64, depth: 2, items: 1_024 },
    Corpus { name: "deep", width: 2, depth: 12, items: 4_096 },
];

/// Returns every registered corpus, smallest first.
#[must_use]
pub fn available_corpora() -> &'static [Corpus] {
    CORPORA
}

impl Corpus {
    /// Identifier used as the Criterion benchmark id.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of elements in each generated collection.
    #[must_use]
    pub fn items(&self) -> usize {
        self.items
    }

    /// Builds a tree of objects `depth` levels deep with `width` keys per
    /// level. Leaves hold their position as an integer.
    #[must_use]
    pub fn document(&self) -> Document {
        build_level(self.width, self.depth, 0)
    }

    /// Path through the first key of every level down to a leaf.
    #[must_use]
    pub fn deepest_path(&self) -> Path {
        (1..self.depth).fold(Path::new(key(0)), |path, _| path.with_segment(key(0)))
    }

    /// Path that leaves the tree at the final level, yielding
    /// `PropertyNotFound` after a full walk.
    #[must_use]
    pub fn missing_path(&self) -> Path {
        let parent = (1..self.depth.saturating_sub(1)).fold(Path::new(key(0)), |path, _| {
            path.with_segment(key(0))
        });
        parent.with_segment("absent")
    }

    /// Returns `(a, b)` where `b` holds the elements of `a` in reverse, so the
    /// two compare equal as multisets but not in order.
    #[must_use]
    pub fn permuted_collections(&self) -> (Vec<Value>, Vec<Value>) {
        let a = self.collection(0);
        let mut b = a.clone();
        b.reverse();
        (a, b)
    }

    /// Returns `(a, b)` where `b` is `a` shifted by a quarter of its length,
    /// so both sides of the diff are non-empty.
    #[must_use]
    pub fn shifted_collections(&self) -> (Vec<Value>, Vec<Value>) {
        (self.collection(0), self.collection(self.items / 4))
    }

    // Every fourth value repeats so duplicates show up in the counts.
    fn collection(&self, offset: usize) -> Vec<Value> {
        (offset..offset + self.items)
            .map(|n| {
                let n = i64::try_from(n - n % 4 / 3).unwrap_or(i64::MAX);
                if n % 2 == 0 {
                    Value::Int64(n)
                } else {
                    Value::String(format!("item-{n}"))
                }
            })
            .collect()
    }
}

fn key(index: usize) -> String {
    format!("k{index}")
}

fn build_level(width: usize, depth: usize, position: usize) -> Document {
    Document::from_map((0..width).map(|index| {
        let value = if depth <= 1 {
            Value::Int64(i64::try_from(position * width + index).unwrap_or(i64::MAX))
        } else {
            Value::Object(build_level(width, depth - 1, position * width + index))
        };
        (key(index), value)
    }))
}
