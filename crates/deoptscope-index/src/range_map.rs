//! Range-keyed associative container with interval queries
//!
//! One flat `BTreeMap` under a custom comparator, instead of nested
//! per-dimension maps: the canonical ordering lives in exactly one place
//! (`RangeKey`) and every query is a pruned window over the tree.

use deoptscope_core::{Position, Range};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Tree key realizing the canonical ordering: ascending by `start`,
/// descending by `end` for equal `start`, so a range enclosing another with
/// the same start sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RangeKey(Range);

impl Ord for RangeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .start()
            .cmp(&other.0.start())
            .then_with(|| other.0.end().cmp(&self.0.end()))
    }
}

impl PartialOrd for RangeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl RangeKey {
    /// First key in canonical order among keys starting at `start`
    /// (the widest range sorts first).
    fn first_at(start: Position) -> Self {
        RangeKey(Range::new(start, Position::MAX))
    }

    /// Last key in canonical order among keys starting at `start`
    /// (the collapsed range sorts last).
    fn last_at(start: Position) -> Self {
        RangeKey(Range::collapsed(start))
    }
}

/// A mapping from [`Range`] to `V`, keys unique by value equality.
///
/// Iteration and all query results follow the canonical ordering regardless
/// of insertion order. Queries are lazy iterators borrowing the map; they
/// are restartable (calling a query again re-reads live state) and the
/// `&self` borrow statically rules out mutation mid-iteration.
#[derive(Debug, Clone)]
pub struct RangeMap<V> {
    entries: BTreeMap<RangeKey, V>,
}

impl<V> Default for RangeMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RangeMap<V> {
    /// Create a new empty map
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Exact-key lookup
    pub fn get(&self, range: Range) -> Option<&V> {
        self.entries.get(&RangeKey(range))
    }

    /// Exact-key mutable lookup
    pub fn get_mut(&mut self, range: Range) -> Option<&mut V> {
        self.entries.get_mut(&RangeKey(range))
    }

    /// Insert a value, replacing and returning any previous value for the
    /// exact same key. Replacement never changes `len`.
    pub fn insert(&mut self, range: Range, value: V) -> Option<V> {
        self.entries.insert(RangeKey(range), value)
    }

    /// Remove the exact-key entry, returning its value if present
    pub fn remove(&mut self, range: Range) -> Option<V> {
        self.entries.remove(&RangeKey(range))
    }

    /// Whether an entry with this exact key exists
    pub fn contains_key(&self, range: Range) -> bool {
        self.entries.contains_key(&RangeKey(range))
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Range, &V)> {
        self.entries.iter().map(|(key, value)| (key.0, value))
    }

    /// All keys in canonical order
    pub fn keys(&self) -> impl Iterator<Item = Range> + '_ {
        self.entries.keys().map(|key| key.0)
    }

    /// All values in canonical order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// Entries whose range fully encloses `query`, in canonical order.
    ///
    /// A containing entry must start at or before `query.start`, so the
    /// window ends at the collapsed key for `query.start`; no later entry
    /// can qualify.
    pub fn find_all_containing(&self, query: impl Into<Range>) -> impl Iterator<Item = (Range, &V)> {
        let query = query.into();
        self.entries
            .range(..=RangeKey::last_at(query.start()))
            .filter(move |(key, _)| key.0.end() >= query.end())
            .map(|(key, value)| (key.0, value))
    }

    /// First containing entry in canonical order (least start; widest at
    /// that start, given the descending-end tie-break)
    pub fn find_least_containing(&self, query: impl Into<Range>) -> Option<(Range, &V)> {
        self.find_all_containing(query).next()
    }

    /// The tightest enclosing entry: greatest qualifying `start`, then least
    /// qualifying `end`.
    ///
    /// This is the one query that walks the ordering backwards. In reverse
    /// canonical order ends ascend within a fixed start, so the first entry
    /// whose end reaches `query.end` is exactly the nearest one.
    pub fn find_nearest_containing(&self, query: impl Into<Range>) -> Option<(Range, &V)> {
        let query = query.into();
        self.entries
            .range(..=RangeKey::last_at(query.start()))
            .rev()
            .find(|(key, _)| key.0.end() >= query.end())
            .map(|(key, value)| (key.0, value))
    }

    /// Entries nested inside `query`, in canonical order.
    ///
    /// The window opens at the widest possible key starting at `query.start`
    /// and closes at the collapsed key for `query.end`; a contained entry
    /// cannot start after `query.end`.
    pub fn find_all_contained_by(&self, query: impl Into<Range>) -> impl Iterator<Item = (Range, &V)> {
        let query = query.into();
        self.entries
            .range(RangeKey::first_at(query.start())..=RangeKey::last_at(query.end()))
            .filter(move |(key, _)| key.0.end() <= query.end())
            .map(|(key, value)| (key.0, value))
    }

    /// First nested entry in canonical order
    pub fn find_least_contained_by(&self, query: impl Into<Range>) -> Option<(Range, &V)> {
        self.find_all_contained_by(query).next()
    }

    /// Entries overlapping `query` at all, boundary touches included, in
    /// canonical order. Scanning stops once a key starts past `query.end`.
    pub fn find_all_intersecting(&self, query: impl Into<Range>) -> impl Iterator<Item = (Range, &V)> {
        let query = query.into();
        self.entries
            .range(..=RangeKey::last_at(query.end()))
            .filter(move |(key, _)| key.0.end() >= query.start())
            .map(|(key, value)| (key.0, value))
    }

    /// First overlapping entry in canonical order
    pub fn find_least_intersecting(&self, query: impl Into<Range>) -> Option<(Range, &V)> {
        self.find_all_intersecting(query).next()
    }
}

impl<V> FromIterator<(Range, V)> for RangeMap<V> {
    fn from_iter<I: IntoIterator<Item = (Range, V)>>(iter: I) -> Self {
        let mut map = RangeMap::new();
        for (range, value) in iter {
            map.insert(range, value);
        }
        map
    }
}
