//! Accepted key indices of one dimension

use std::collections::BTreeSet;
use std::ops::Range;

/// Which key indices a predicate accepts, in index space
///
/// Ranges resolve to a contiguous span after a binary search on the sorted
/// keys, so diffing two spans only walks the keys between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Selection {
    All,
    Span(Range<usize>),
    Set(BTreeSet<usize>),
}

impl Selection {
    pub(super) fn contains(&self, k: usize) -> bool {
        match self {
            Selection::All => true,
            Selection::Span(span) => span.contains(&k),
            Selection::Set(set) => set.contains(&k),
        }
    }

    pub(super) fn iter(&self, key_count: usize) -> Box<dyn Iterator<Item = usize> + '_> {
        match self {
            Selection::All => Box::new(0..key_count),
            Selection::Span(span) => Box::new(span.clone()),
            Selection::Set(set) => Box::new(set.iter().copied()),
        }
    }
}
