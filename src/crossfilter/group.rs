//! Count aggregates over one dimension

use super::Key;
use serde::Serialize;

/// One bar of an aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupEntry {
    pub key: Key,
    pub value: u64,
}

/// Read-only view over a dimension's per-key counts
///
/// Counts reflect every predicate except the dimension's own.
#[derive(Debug, Clone, Copy)]
pub struct Group<'a> {
    keys: &'a [Key],
    counts: &'a [u64],
}

impl<'a> Group<'a> {
    pub(super) fn new(keys: &'a [Key], counts: &'a [u64]) -> Self {
        Self { keys, counts }
    }

    /// Every key in ascending key order, zero counts included
    pub fn all(&self) -> Vec<GroupEntry> {
        self.keys
            .iter()
            .zip(self.counts)
            .map(|(key, &value)| GroupEntry {
                key: key.clone(),
                value,
            })
            .collect()
    }

    /// The `n` largest counts, descending; equal counts in ascending key order
    pub fn top(&self, n: usize) -> Vec<GroupEntry> {
        let mut entries = self.all();
        sort_by_count(&mut entries);
        entries.truncate(n);
        entries
    }

    /// Sum of all counts
    #[allow(dead_code)] // Reserved for share-of-total readouts
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    #[allow(dead_code)] // Reserved for group inspection
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[allow(dead_code)] // Reserved for group inspection
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Descending count, ascending key for ties
pub fn sort_by_count(entries: &mut [GroupEntry]) {
    entries.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.key.cmp(&b.key)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<Key>, Vec<u64>) {
        (
            vec![
                Key::text("a"),
                Key::text("b"),
                Key::text("c"),
                Key::text("d"),
            ],
            vec![3, 5, 3, 1],
        )
    }

    #[test]
    fn test_top_sorted_with_key_tiebreak() {
        let (keys, counts) = sample();
        let group = Group::new(&keys, &counts);
        let top: Vec<_> = group
            .top(3)
            .into_iter()
            .map(|e| (e.key.to_string(), e.value))
            .collect();
        assert_eq!(
            top,
            vec![("b".into(), 5), ("a".into(), 3), ("c".into(), 3)]
        );
    }

    #[test]
    fn test_top_is_subset_of_all() {
        let (keys, counts) = sample();
        let group = Group::new(&keys, &counts);
        let all = group.all();
        for n in 0..=5 {
            let top = group.top(n);
            assert_eq!(top.len(), n.min(all.len()));
            assert!(top.iter().all(|e| all.contains(e)));
            assert!(top.windows(2).all(|w| w[0].value >= w[1].value));
            // Nothing left out has a larger count than the smallest kept
            if let Some(min) = top.last() {
                let excluded_max = all
                    .iter()
                    .filter(|e| !top.contains(e))
                    .map(|e| e.value)
                    .max()
                    .unwrap_or(0);
                assert!(excluded_max <= min.value);
            }
        }
    }

    #[test]
    fn test_total() {
        let (keys, counts) = sample();
        assert_eq!(Group::new(&keys, &counts).total(), 12);
    }
}
