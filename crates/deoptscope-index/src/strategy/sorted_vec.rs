//! Flat sorted-vector backing store
//!
//! One contiguous `Vec` kept in canonical order with binary-searched
//! insertion. Queries become `partition_point` windows over the slice.
//! Cheapest iteration and the best cache behavior of the strategies, paid
//! for with O(n) shifts on insert and remove.

use crate::strategy::{canonical_cmp, RangeStore};
use deoptscope_core::Range;

/// Range store backed by a single sorted vector
#[derive(Debug, Clone)]
pub struct SortedVecMap<V> {
    entries: Vec<(Range, V)>,
}

impl<V> Default for SortedVecMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SortedVecMap<V> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn search(&self, range: Range) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|(key, _)| canonical_cmp(*key, range))
    }

    /// Index one past the last entry whose start is at or before `position`
    fn starts_through(&self, position: deoptscope_core::Position) -> usize {
        self.entries
            .partition_point(|(key, _)| key.start() <= position)
    }
}

impl<V> RangeStore<V> for SortedVecMap<V> {
    fn name(&self) -> &'static str {
        "sorted-vec"
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, range: Range) -> Option<&V> {
        let index = self.search(range).ok()?;
        Some(&self.entries[index].1)
    }

    fn insert(&mut self, range: Range, value: V) -> Option<V> {
        match self.search(range) {
            Ok(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            Err(index) => {
                self.entries.insert(index, (range, value));
                None
            }
        }
    }

    fn remove(&mut self, range: Range) -> Option<V> {
        let index = self.search(range).ok()?;
        Some(self.entries.remove(index).1)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn entries(&self) -> Vec<(Range, &V)> {
        self.entries.iter().map(|(key, value)| (*key, value)).collect()
    }

    fn find_all_containing(&self, query: Range) -> Vec<(Range, &V)> {
        self.entries[..self.starts_through(query.start())]
            .iter()
            .filter(|(key, _)| key.end() >= query.end())
            .map(|(key, value)| (*key, value))
            .collect()
    }

    fn find_nearest_containing(&self, query: Range) -> Option<(Range, &V)> {
        self.entries[..self.starts_through(query.start())]
            .iter()
            .rev()
            .find(|(key, _)| key.end() >= query.end())
            .map(|(key, value)| (*key, value))
    }

    fn find_all_contained_by(&self, query: Range) -> Vec<(Range, &V)> {
        let lower = self
            .entries
            .partition_point(|(key, _)| key.start() < query.start());
        let upper = self.starts_through(query.end());
        self.entries[lower..upper]
            .iter()
            .filter(|(key, _)| key.end() <= query.end())
            .map(|(key, value)| (*key, value))
            .collect()
    }

    fn find_all_intersecting(&self, query: Range) -> Vec<(Range, &V)> {
        self.entries[..self.starts_through(query.end())]
            .iter()
            .filter(|(key, _)| key.end() >= query.start())
            .map(|(key, value)| (*key, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_canonical_order() {
        let mut map = SortedVecMap::new();
        map.insert(Range::of(2, 0, 2, 5), 3);
        map.insert(Range::of(0, 0, 6, 0), 2);
        map.insert(Range::of(0, 0, 10, 0), 1);
        let values: Vec<i32> = map.entries().into_iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut map = SortedVecMap::new();
        let r = Range::of(1, 0, 1, 4);
        assert_eq!(map.insert(r, "old"), None);
        assert_eq!(map.insert(r, "new"), Some("old"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove(r), Some("new"));
        assert_eq!(map.remove(r), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_windows_prune_correctly() {
        let mut map = SortedVecMap::new();
        map.insert(Range::of(4, 0, 4, 9), 0);
        map.insert(Range::of(5, 0, 6, 10), 1);
        map.insert(Range::of(6, 15, 7, 0), 2);

        let hits: Vec<i32> = map
            .find_all_intersecting(Range::of(6, 9, 6, 11))
            .into_iter()
            .map(|(_, v)| *v)
            .collect();
        assert_eq!(hits, vec![1]);

        let nested: Vec<i32> = map
            .find_all_contained_by(Range::of(4, 0, 7, 0))
            .into_iter()
            .map(|(_, v)| *v)
            .collect();
        assert_eq!(nested, vec![0, 1, 2]);
    }
}
