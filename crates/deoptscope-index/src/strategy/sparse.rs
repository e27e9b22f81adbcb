//! Sparse per-line backing store
//!
//! A plain `Vec` indexed by start line, each slot an optional bucket of
//! entries kept sorted in canonical order. Competitive when ranges are
//! small and dense (trace-log entries cluster on hot lines); wasteful when
//! start lines are sparse, since empty slots still occupy the spine.

use crate::strategy::{canonical_cmp, RangeStore};
use deoptscope_core::Range;

/// Range store backed by a sparse line-indexed array
#[derive(Debug, Clone)]
pub struct SparseLineMap<V> {
    lines: Vec<Option<Vec<(Range, V)>>>,
    len: usize,
}

impl<V> Default for SparseLineMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SparseLineMap<V> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            len: 0,
        }
    }

    fn bucket(&self, line: u32) -> Option<&Vec<(Range, V)>> {
        self.lines.get(line as usize)?.as_ref()
    }

    /// Last spine index worth visiting for an upper line bound
    fn spine_end(&self, line: u32) -> usize {
        self.lines.len().min(line as usize + 1)
    }
}

impl<V> RangeStore<V> for SparseLineMap<V> {
    fn name(&self) -> &'static str {
        "sparse-lines"
    }

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, range: Range) -> Option<&V> {
        let bucket = self.bucket(range.start().line)?;
        let index = bucket
            .binary_search_by(|(key, _)| canonical_cmp(*key, range))
            .ok()?;
        Some(&bucket[index].1)
    }

    fn insert(&mut self, range: Range, value: V) -> Option<V> {
        let slot = range.start().line as usize;
        if slot >= self.lines.len() {
            self.lines.resize_with(slot + 1, || None);
        }
        let bucket = self.lines[slot].get_or_insert_with(Vec::new);
        match bucket.binary_search_by(|(key, _)| canonical_cmp(*key, range)) {
            Ok(index) => Some(std::mem::replace(&mut bucket[index].1, value)),
            Err(index) => {
                bucket.insert(index, (range, value));
                self.len += 1;
                None
            }
        }
    }

    fn remove(&mut self, range: Range) -> Option<V> {
        let slot = self.lines.get_mut(range.start().line as usize)?;
        let bucket = slot.as_mut()?;
        let index = bucket
            .binary_search_by(|(key, _)| canonical_cmp(*key, range))
            .ok()?;
        let (_, value) = bucket.remove(index);
        if bucket.is_empty() {
            *slot = None;
        }
        self.len -= 1;
        Some(value)
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.len = 0;
    }

    fn entries(&self) -> Vec<(Range, &V)> {
        let mut out = Vec::with_capacity(self.len);
        for bucket in self.lines.iter().flatten() {
            for (range, value) in bucket {
                out.push((*range, value));
            }
        }
        out
    }

    fn find_all_containing(&self, query: Range) -> Vec<(Range, &V)> {
        let mut out = Vec::new();
        for bucket in self.lines[..self.spine_end(query.start().line)]
            .iter()
            .flatten()
        {
            // Buckets sort ascending by start character, so the scan can
            // stop at the first entry starting past the query.
            for (range, value) in bucket {
                if range.start() > query.start() {
                    break;
                }
                if range.end() >= query.end() {
                    out.push((*range, value));
                }
            }
        }
        out
    }

    fn find_nearest_containing(&self, query: Range) -> Option<(Range, &V)> {
        // Walk lines backwards; within a bucket, reverse canonical order
        // yields descending starts with ascending ends per start, so the
        // first hit is the greatest start with the least qualifying end.
        for bucket in self.lines[..self.spine_end(query.start().line)]
            .iter()
            .rev()
            .flatten()
        {
            let hit = bucket
                .iter()
                .rev()
                .skip_while(|(range, _)| range.start() > query.start())
                .find(|(range, _)| range.end() >= query.end());
            if let Some((range, value)) = hit {
                return Some((*range, value));
            }
        }
        None
    }

    fn find_all_contained_by(&self, query: Range) -> Vec<(Range, &V)> {
        let mut out = Vec::new();
        let first = (query.start().line as usize).min(self.lines.len());
        for bucket in self.lines[first..self.spine_end(query.end().line)]
            .iter()
            .flatten()
        {
            for (range, value) in bucket {
                if range.start() > query.end() {
                    break;
                }
                if range.start() >= query.start() && range.end() <= query.end() {
                    out.push((*range, value));
                }
            }
        }
        out
    }

    fn find_all_intersecting(&self, query: Range) -> Vec<(Range, &V)> {
        let mut out = Vec::new();
        for bucket in self.lines[..self.spine_end(query.end().line)]
            .iter()
            .flatten()
        {
            for (range, value) in bucket {
                if range.start() > query.end() {
                    break;
                }
                if range.end() >= query.start() {
                    out.push((*range, value));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_freed_on_last_remove() {
        let mut map = SparseLineMap::new();
        map.insert(Range::of(7, 0, 7, 5), 'x');
        map.insert(Range::of(7, 2, 7, 3), 'y');
        assert_eq!(map.len(), 2);

        assert_eq!(map.remove(Range::of(7, 0, 7, 5)), Some('x'));
        assert_eq!(map.remove(Range::of(7, 2, 7, 3)), Some('y'));
        assert!(map.bucket(7).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_bucket_keeps_canonical_order() {
        let mut map = SparseLineMap::new();
        map.insert(Range::of(3, 4, 3, 6), "b");
        map.insert(Range::of(3, 0, 3, 2), "a2");
        map.insert(Range::of(3, 0, 3, 9), "a1"); // same start, wider end first
        let keys: Vec<Range> = map.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                Range::of(3, 0, 3, 9),
                Range::of(3, 0, 3, 2),
                Range::of(3, 4, 3, 6),
            ]
        );
    }

    #[test]
    fn test_query_past_spine_is_empty_not_panic() {
        let mut map = SparseLineMap::new();
        map.insert(Range::of(1, 0, 1, 5), ());
        assert!(map.find_all_containing(Range::of(900, 0, 900, 1)).is_empty());
        assert!(map
            .find_all_contained_by(Range::of(900, 0, 901, 0))
            .is_empty());
        assert_eq!(map.find_all_intersecting(Range::of(900, 0, 900, 1)).len(), 0);
    }
}
