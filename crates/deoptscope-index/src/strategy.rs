//! Competing backing stores behind one contract
//!
//! [`RangeStore`] is the capability-set shared by every backing-store
//! strategy: exact lookup plus the interval query families. Production code
//! uses [`RangeMap`] directly (no dynamic dispatch); the trait exists so the
//! benchmark harness and the equivalence tests can drive each strategy
//! through the same calls. Query methods return `Vec` rather than lazy
//! iterators to keep the trait object-safe.
//!
//! Every strategy must produce results identical to [`RangeMap`], ordering
//! included; only throughput and memory are allowed to differ.

mod nested;
mod sorted_vec;
mod sparse;

pub use nested::NestedRangeMap;
pub use sorted_vec::SortedVecMap;
pub use sparse::SparseLineMap;

use crate::range_map::RangeMap;
use deoptscope_core::Range;
use std::cmp::Ordering;

/// Canonical ordering over whole ranges: ascending start, descending end
/// for equal starts.
pub(crate) fn canonical_cmp(a: Range, b: Range) -> Ordering {
    a.start()
        .cmp(&b.start())
        .then_with(|| b.end().cmp(&a.end()))
}

/// The contract every backing store implements
pub trait RangeStore<V> {
    /// Strategy name, for benchmark reports
    fn name(&self) -> &'static str;

    /// Number of entries
    fn len(&self) -> usize;

    /// Whether the store holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact-key lookup
    fn get(&self, range: Range) -> Option<&V>;

    /// Insert or replace; replacement returns the old value
    fn insert(&mut self, range: Range, value: V) -> Option<V>;

    /// Remove the exact-key entry
    fn remove(&mut self, range: Range) -> Option<V>;

    /// Remove all entries
    fn clear(&mut self);

    /// All entries in canonical order
    fn entries(&self) -> Vec<(Range, &V)>;

    /// Entries whose range fully encloses `query`, in canonical order
    fn find_all_containing(&self, query: Range) -> Vec<(Range, &V)>;

    /// Tightest enclosing entry: greatest qualifying start, least
    /// qualifying end
    fn find_nearest_containing(&self, query: Range) -> Option<(Range, &V)>;

    /// Entries nested inside `query`, in canonical order
    fn find_all_contained_by(&self, query: Range) -> Vec<(Range, &V)>;

    /// Entries overlapping `query` (boundary touches included), in
    /// canonical order
    fn find_all_intersecting(&self, query: Range) -> Vec<(Range, &V)>;

    /// First containing entry in canonical order
    fn find_least_containing(&self, query: Range) -> Option<(Range, &V)> {
        self.find_all_containing(query).into_iter().next()
    }

    /// First nested entry in canonical order
    fn find_least_contained_by(&self, query: Range) -> Option<(Range, &V)> {
        self.find_all_contained_by(query).into_iter().next()
    }

    /// First overlapping entry in canonical order
    fn find_least_intersecting(&self, query: Range) -> Option<(Range, &V)> {
        self.find_all_intersecting(query).into_iter().next()
    }
}

impl<V> RangeStore<V> for RangeMap<V> {
    fn name(&self) -> &'static str {
        "flat-tree"
    }

    fn len(&self) -> usize {
        RangeMap::len(self)
    }

    fn get(&self, range: Range) -> Option<&V> {
        RangeMap::get(self, range)
    }

    fn insert(&mut self, range: Range, value: V) -> Option<V> {
        RangeMap::insert(self, range, value)
    }

    fn remove(&mut self, range: Range) -> Option<V> {
        RangeMap::remove(self, range)
    }

    fn clear(&mut self) {
        RangeMap::clear(self);
    }

    fn entries(&self) -> Vec<(Range, &V)> {
        self.iter().collect()
    }

    fn find_all_containing(&self, query: Range) -> Vec<(Range, &V)> {
        RangeMap::find_all_containing(self, query).collect()
    }

    fn find_nearest_containing(&self, query: Range) -> Option<(Range, &V)> {
        RangeMap::find_nearest_containing(self, query)
    }

    fn find_all_contained_by(&self, query: Range) -> Vec<(Range, &V)> {
        RangeMap::find_all_contained_by(self, query).collect()
    }

    fn find_all_intersecting(&self, query: Range) -> Vec<(Range, &V)> {
        RangeMap::find_all_intersecting(self, query).collect()
    }
}
