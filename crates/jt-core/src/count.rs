use std::hash::Hash;

use indexmap::IndexMap;

/// Remaining occurrence counts of the elements of one collection.
///
/// Keys keep the order in which they were first seen so anything derived
/// from the leftovers is deterministic.
pub(crate) struct Frequencies<'a, T> {
    counts: IndexMap<&'a T, usize>,
}

impl<'a, T> Frequencies<'a, T>
where
    T: Eq + Hash,
{
    pub(crate) fn of(items: &'a [T]) -> Self {
        let mut counts = IndexMap::with_capacity(items.len());
        for item in items {
            *counts.entry(item).or_insert(0usize) += 1;
        }
        Self { counts }
    }

    /// Consumes one occurrence of `item`; `false` when none is left.
    pub(crate) fn take(&mut self, item: &T) -> bool {
        match self.counts.get_mut(item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Elements with occurrences left, with how many remain.
    pub(crate) fn remaining(&self) -> impl Iterator<Item = (&'a T, usize)> + '_ {
        self.counts.iter().filter(|(_, count)| **count > 0).map(|(item, count)| (*item, *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_duplicates() {
        let items = [1, 2, 2, 3, 3, 3];
        let freq = Frequencies::of(&items);
        assert_eq!(freq.remaining().collect::<Vec<_>>(), [(&1, 1), (&2, 2), (&3, 3)]);
    }

    #[test]
    fn take_never_goes_below_zero() {
        let items = ["a"];
        let mut freq = Frequencies::of(&items);
        assert!(freq.take(&"a"));
        assert!(!freq.take(&"a"));
        assert!(!freq.take(&"b"));
        assert_eq!(freq.remaining().count(), 0);
    }

    #[test]
    fn remaining_keeps_first_seen_order() {
        let items = ["c", "a", "c", "b"];
        let mut freq = Frequencies::of(&items);
        assert!(freq.take(&"a"));
        let left: Vec<_> = freq.remaining().map(|(item, _)| *item).collect();
        assert_eq!(left, ["c", "b"]);
    }
}
