//! Cross-filter index over an in-memory record set
//!
//! Each dimension sorts the records by their projected key once and keeps,
//! per record, one "rejected by dimension d" bit in a shared mask. A record
//! passes every filter when its mask is zero.
//!
//! Group counts are maintained incrementally: a dimension's count for key k
//! is the number of records with key k whose mask is zero once the
//! dimension's *own* bit is ignored. Changing a predicate only visits keys
//! whose acceptance flips, and only the records under those keys.
//!
//! ```text
//! set_filter(d, p) → keys flipping acceptance → their records → mask bit d
//!                                                     ↓
//!                                   counts of every other dimension
//! ```

mod group;
mod key;
mod selection;

pub use group::{sort_by_count, Group, GroupEntry};
pub use key::{Key, Predicate};

use selection::Selection;
use std::fmt;

/// Maximum number of dimensions per index (one mask bit each)
pub const MAX_DIMENSIONS: usize = 64;

/// Errors surfaced by the cross-filter index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The handle refers to a dimension of a previous build, or never existed
    UnknownDimension(DimensionId),
    /// All mask bits are already in use
    TooManyDimensions,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDimension(id) => write!(
                f,
                "Unknown dimension #{} (generation {})",
                id.index, id.generation
            ),
            Self::TooManyDimensions => {
                write!(f, "Too many dimensions (max {})", MAX_DIMENSIONS)
            }
        }
    }
}

impl std::error::Error for FilterError {}

/// Handle to a registered dimension
///
/// Carries the index generation so handles from before a `rebuild` are
/// rejected instead of silently addressing a different dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimensionId {
    index: usize,
    generation: u64,
}

struct Dimension {
    name: String,
    bit: u64,
    /// Distinct keys, ascending
    keys: Vec<Key>,
    /// Record index → key index
    key_of: Vec<u32>,
    /// Record indices grouped by key (stable within a key)
    members: Vec<u32>,
    /// `members[offsets[k]..offsets[k + 1]]` are the records with key k
    offsets: Vec<usize>,
    /// Per key: records passing every other dimension's filter
    counts: Vec<u64>,
    predicate: Predicate,
    selection: Selection,
}

impl Dimension {
    fn records_of(&self, key_index: usize) -> &[u32] {
        &self.members[self.offsets[key_index]..self.offsets[key_index + 1]]
    }

    fn select(&self, predicate: &Predicate) -> Selection {
        match predicate {
            Predicate::All => Selection::All,
            Predicate::Range { lo, hi } => {
                let start = self.keys.partition_point(|k| k < lo);
                let end = self.keys.partition_point(|k| k <= hi);
                Selection::Span(start..end.max(start))
            }
            Predicate::Keys(set) => Selection::Set(
                set.iter()
                    .filter_map(|k| self.keys.binary_search(k).ok())
                    .collect(),
            ),
        }
    }
}

/// Multi-dimensional filter index
pub struct CrossFilter<R> {
    records: Vec<R>,
    /// Bit d set = record rejected by dimension d
    masks: Vec<u64>,
    dimensions: Vec<Dimension>,
    generation: u64,
}

impl<R> CrossFilter<R> {
    /// Index a record set; no dimensions yet
    pub fn new(records: Vec<R>) -> Self {
        let masks = vec![0; records.len()];
        Self {
            records,
            masks,
            dimensions: Vec::new(),
            generation: 0,
        }
    }

    /// Discard every dimension and predicate and index a new record set
    ///
    /// Handles issued before the rebuild become invalid.
    pub fn rebuild(&mut self, records: Vec<R>) {
        self.masks = vec![0; records.len()];
        self.records = records;
        self.dimensions.clear();
        self.generation += 1;
    }

    /// Total number of records
    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Register a dimension projected by `projection`
    ///
    /// The projection is evaluated once per record; the key index is sorted
    /// here so later range filters can binary-search it.
    pub fn create_dimension<F>(
        &mut self,
        name: impl Into<String>,
        projection: F,
    ) -> Result<DimensionId, FilterError>
    where
        F: Fn(&R) -> Key,
    {
        let index = self.dimensions.len();
        if index >= MAX_DIMENSIONS {
            return Err(FilterError::TooManyDimensions);
        }
        let name = name.into();

        let projected: Vec<Key> = self.records.iter().map(&projection).collect();

        let mut order: Vec<u32> = (0..self.records.len() as u32).collect();
        order.sort_by(|a, b| projected[*a as usize].cmp(&projected[*b as usize]));

        let mut keys: Vec<Key> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();
        let mut key_of = vec![0u32; self.records.len()];
        for (pos, &r) in order.iter().enumerate() {
            let key = &projected[r as usize];
            if keys.last() != Some(key) {
                keys.push(key.clone());
                offsets.push(pos);
            }
            key_of[r as usize] = (keys.len() - 1) as u32;
        }
        offsets.push(order.len());

        // A fresh dimension filters nothing, so "passing every other
        // dimension" is exactly "mask is zero".
        let mut counts = vec![0u64; keys.len()];
        for (r, &mask) in self.masks.iter().enumerate() {
            if mask == 0 {
                counts[key_of[r] as usize] += 1;
            }
        }

        tracing::debug!(
            "Dimension '{}' indexed: {} records, {} keys",
            name,
            self.records.len(),
            keys.len()
        );

        self.dimensions.push(Dimension {
            name,
            bit: 1u64 << index,
            keys,
            key_of,
            members: order,
            offsets,
            counts,
            predicate: Predicate::All,
            selection: Selection::All,
        });

        Ok(DimensionId {
            index,
            generation: self.generation,
        })
    }

    fn check(&self, id: DimensionId) -> Result<usize, FilterError> {
        if id.generation == self.generation && id.index < self.dimensions.len() {
            Ok(id.index)
        } else {
            Err(FilterError::UnknownDimension(id))
        }
    }

    #[allow(dead_code)] // Reserved for diagnostics; the registry keeps its own names
    pub fn dimension_name(&self, id: DimensionId) -> Result<&str, FilterError> {
        let d = self.check(id)?;
        Ok(&self.dimensions[d].name)
    }

    #[allow(dead_code)] // Reserved for diagnostics; histograms track their clicked keys
    pub fn predicate(&self, id: DimensionId) -> Result<&Predicate, FilterError> {
        let d = self.check(id)?;
        Ok(&self.dimensions[d].predicate)
    }

    /// Key a record projects to along `id`
    #[allow(dead_code)] // Reserved for record inspection
    pub fn key_of(&self, id: DimensionId, record: usize) -> Result<Option<&Key>, FilterError> {
        let d = self.check(id)?;
        let dim = &self.dimensions[d];
        Ok(dim
            .key_of
            .get(record)
            .map(|&k| &dim.keys[k as usize]))
    }

    /// Replace the predicate of one dimension
    pub fn set_filter(&mut self, id: DimensionId, predicate: Predicate) -> Result<(), FilterError> {
        let d = self.check(id)?;
        let new_selection = self.dimensions[d].select(&predicate);
        let old_selection =
            std::mem::replace(&mut self.dimensions[d].selection, new_selection.clone());
        self.dimensions[d].predicate = predicate;

        let key_count = self.dimensions[d].keys.len();
        let mut rejected: Vec<usize> = Vec::new();
        let mut accepted: Vec<usize> = Vec::new();
        for k in old_selection.iter(key_count) {
            if !new_selection.contains(k) {
                rejected.push(k);
            }
        }
        for k in new_selection.iter(key_count) {
            if !old_selection.contains(k) {
                accepted.push(k);
            }
        }

        let mut touched = 0usize;
        for k in rejected {
            touched += self.flip_key(d, k, true);
        }
        for k in accepted {
            touched += self.flip_key(d, k, false);
        }

        tracing::trace!(
            "Filter on '{}' updated, {} records changed",
            self.dimensions[d].name,
            touched
        );
        Ok(())
    }

    pub fn filter_all(&mut self, id: DimensionId) -> Result<(), FilterError> {
        self.set_filter(id, Predicate::All)
    }

    pub fn filter_range(
        &mut self,
        id: DimensionId,
        lo: impl Into<Key>,
        hi: impl Into<Key>,
    ) -> Result<(), FilterError> {
        self.set_filter(id, Predicate::range(lo, hi))
    }

    #[allow(dead_code)] // Reserved for key filters built outside a histogram toggle
    pub fn filter_keys<I, K>(&mut self, id: DimensionId, keys: I) -> Result<(), FilterError>
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.set_filter(id, Predicate::keys(keys))
    }

    /// Set or clear dimension `d`'s bit on every record under key `k`
    fn flip_key(&mut self, d: usize, k: usize, reject: bool) -> usize {
        let bit = self.dimensions[d].bit;
        let start = self.dimensions[d].offsets[k];
        let end = self.dimensions[d].offsets[k + 1];

        for pos in start..end {
            let r = self.dimensions[d].members[pos] as usize;
            let old = self.masks[r];
            let new = if reject { old | bit } else { old & !bit };
            if old == new {
                continue;
            }
            self.masks[r] = new;

            for (e, other) in self.dimensions.iter_mut().enumerate() {
                if e == d {
                    continue;
                }
                let was = old & !other.bit == 0;
                let now = new & !other.bit == 0;
                if was != now {
                    let slot = &mut other.counts[other.key_of[r] as usize];
                    if now {
                        *slot += 1;
                    } else {
                        *slot -= 1;
                    }
                }
            }
        }
        end - start
    }

    /// Indices of records passing every predicate, in record order
    pub fn filtered_indices(&self) -> Vec<usize> {
        self.masks
            .iter()
            .enumerate()
            .filter(|(_, &m)| m == 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Records passing every predicate, in record order
    #[allow(dead_code)] // Reserved for record export; views work on indices
    pub fn all_filtered(&self) -> Vec<&R> {
        self.masks
            .iter()
            .zip(&self.records)
            .filter(|(&m, _)| m == 0)
            .map(|(_, r)| r)
            .collect()
    }

    /// Number of records passing every predicate
    pub fn filtered_count(&self) -> usize {
        self.masks.iter().filter(|&&m| m == 0).count()
    }

    /// Whether a record passes every predicate
    pub fn is_passing(&self, record: usize) -> bool {
        self.masks.get(record).is_some_and(|&m| m == 0)
    }

    /// Count aggregate of a dimension
    pub fn group(&self, id: DimensionId) -> Result<Group<'_>, FilterError> {
        let d = self.check(id)?;
        let dim = &self.dimensions[d];
        Ok(Group::new(&dim.keys, &dim.counts))
    }

    /// Record indices under one key of a dimension
    pub fn records_with_key(&self, id: DimensionId, key: &Key) -> Result<&[u32], FilterError> {
        let d = self.check(id)?;
        let dim = &self.dimensions[d];
        Ok(match dim.keys.binary_search(key) {
            Ok(k) => dim.records_of(k),
            Err(_) => &[],
        })
    }
}
