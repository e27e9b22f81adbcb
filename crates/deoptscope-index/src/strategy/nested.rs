//! Four-level nested-map backing store
//!
//! Keys decompose into `start.line -> start.character -> end.line ->
//! end.character`, each level an ordered map. The end levels are keyed by
//! `Reverse` so in-order traversal realizes descending-end canonical order.
//! Every query re-derives its pruning bounds at each nesting level, which is
//! the duplication the flat production tree exists to avoid.

use crate::strategy::RangeStore;
use deoptscope_core::Range;
use std::cmp::Reverse;
use std::collections::BTreeMap;

type EndChars<V> = BTreeMap<Reverse<u32>, V>;
type EndLines<V> = BTreeMap<Reverse<u32>, EndChars<V>>;
type StartChars<V> = BTreeMap<u32, EndLines<V>>;

/// Range store backed by nested per-dimension ordered maps
#[derive(Debug, Clone)]
pub struct NestedRangeMap<V> {
    lines: BTreeMap<u32, StartChars<V>>,
    len: usize,
}

impl<V> Default for NestedRangeMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> NestedRangeMap<V> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            lines: BTreeMap::new(),
            len: 0,
        }
    }
}

impl<V> RangeStore<V> for NestedRangeMap<V> {
    fn name(&self) -> &'static str {
        "nested-maps"
    }

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, range: Range) -> Option<&V> {
        self.lines
            .get(&range.start().line)?
            .get(&range.start().character)?
            .get(&Reverse(range.end().line))?
            .get(&Reverse(range.end().character))
    }

    fn insert(&mut self, range: Range, value: V) -> Option<V> {
        let previous = self
            .lines
            .entry(range.start().line)
            .or_default()
            .entry(range.start().character)
            .or_default()
            .entry(Reverse(range.end().line))
            .or_default()
            .insert(Reverse(range.end().character), value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    fn remove(&mut self, range: Range) -> Option<V> {
        let start_chars = self.lines.get_mut(&range.start().line)?;
        let end_lines = start_chars.get_mut(&range.start().character)?;
        let end_chars = end_lines.get_mut(&Reverse(range.end().line))?;
        let removed = end_chars.remove(&Reverse(range.end().character))?;
        // Prune empty levels bottom-up so iteration never visits husks.
        if end_chars.is_empty() {
            end_lines.remove(&Reverse(range.end().line));
        }
        if end_lines.is_empty() {
            start_chars.remove(&range.start().character);
        }
        if start_chars.is_empty() {
            self.lines.remove(&range.start().line);
        }
        self.len -= 1;
        Some(removed)
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.len = 0;
    }

    fn entries(&self) -> Vec<(Range, &V)> {
        let mut out = Vec::with_capacity(self.len);
        for (&start_line, start_chars) in &self.lines {
            for (&start_char, end_lines) in start_chars {
                for (&Reverse(end_line), end_chars) in end_lines {
                    for (&Reverse(end_char), value) in end_chars {
                        out.push((Range::of(start_line, start_char, end_line, end_char), value));
                    }
                }
            }
        }
        out
    }

    fn find_all_containing(&self, query: Range) -> Vec<(Range, &V)> {
        let mut out = Vec::new();
        for (&start_line, start_chars) in self.lines.range(..=query.start().line) {
            let char_hi = if start_line == query.start().line {
                query.start().character
            } else {
                u32::MAX
            };
            for (&start_char, end_lines) in start_chars.range(..=char_hi) {
                for (&Reverse(end_line), end_chars) in
                    end_lines.range(..=Reverse(query.end().line))
                {
                    let end_char_lo = if end_line == query.end().line {
                        query.end().character
                    } else {
                        0
                    };
                    for (&Reverse(end_char), value) in end_chars.range(..=Reverse(end_char_lo)) {
                        out.push((Range::of(start_line, start_char, end_line, end_char), value));
                    }
                }
            }
        }
        out
    }

    fn find_nearest_containing(&self, query: Range) -> Option<(Range, &V)> {
        // Starts are walked backwards; the first start with any qualifying
        // end is the greatest one, and within it the least qualifying end
        // wins the tie.
        for (&start_line, start_chars) in self.lines.range(..=query.start().line).rev() {
            let char_hi = if start_line == query.start().line {
                query.start().character
            } else {
                u32::MAX
            };
            for (&start_char, end_lines) in start_chars.range(..=char_hi).rev() {
                for (&Reverse(end_line), end_chars) in
                    end_lines.range(..=Reverse(query.end().line)).rev()
                {
                    let end_char_lo = if end_line == query.end().line {
                        query.end().character
                    } else {
                        0
                    };
                    if let Some((&Reverse(end_char), value)) =
                        end_chars.range(..=Reverse(end_char_lo)).next_back()
                    {
                        return Some((
                            Range::of(start_line, start_char, end_line, end_char),
                            value,
                        ));
                    }
                }
            }
        }
        None
    }

    fn find_all_contained_by(&self, query: Range) -> Vec<(Range, &V)> {
        let mut out = Vec::new();
        for (&start_line, start_chars) in
            self.lines.range(query.start().line..=query.end().line)
        {
            let char_lo = if start_line == query.start().line {
                query.start().character
            } else {
                0
            };
            let char_hi = if start_line == query.end().line {
                query.end().character
            } else {
                u32::MAX
            };
            for (&start_char, end_lines) in start_chars.range(char_lo..=char_hi) {
                for (&Reverse(end_line), end_chars) in
                    end_lines.range(Reverse(query.end().line)..)
                {
                    let end_char_hi = if end_line == query.end().line {
                        query.end().character
                    } else {
                        u32::MAX
                    };
                    for (&Reverse(end_char), value) in end_chars.range(Reverse(end_char_hi)..) {
                        out.push((Range::of(start_line, start_char, end_line, end_char), value));
                    }
                }
            }
        }
        out
    }

    fn find_all_intersecting(&self, query: Range) -> Vec<(Range, &V)> {
        let mut out = Vec::new();
        for (&start_line, start_chars) in self.lines.range(..=query.end().line) {
            let char_hi = if start_line == query.end().line {
                query.end().character
            } else {
                u32::MAX
            };
            for (&start_char, end_lines) in start_chars.range(..=char_hi) {
                for (&Reverse(end_line), end_chars) in
                    end_lines.range(..=Reverse(query.start().line))
                {
                    let end_char_lo = if end_line == query.start().line {
                        query.start().character
                    } else {
                        0
                    };
                    for (&Reverse(end_char), value) in end_chars.range(..=Reverse(end_char_lo)) {
                        out.push((Range::of(start_line, start_char, end_line, end_char), value));
                    }
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
    fn test_levels_pruned_on_remove() {
        let mut map = NestedRangeMap::new();
        map.insert(Range::of(1, 2, 3, 4), "a");
        map.insert(Range::of(1, 2, 3, 9), "b");
        assert_eq!(map.len(), 2);

        assert_eq!(map.remove(Range::of(1, 2, 3, 4)), Some("a"));
        assert_eq!(map.remove(Range::of(1, 2, 3, 9)), Some("b"));
        assert!(map.is_empty());
        assert!(map.lines.is_empty(), "all nesting levels pruned");
        assert_eq!(map.remove(Range::of(1, 2, 3, 4)), None);
    }

    #[test]
    fn test_entries_follow_canonical_order() {
        let mut map = NestedRangeMap::new();
        map.insert(Range::of(0, 5, 0, 7), 3);
        map.insert(Range::of(0, 0, 2, 0), 1);
        map.insert(Range::of(0, 0, 1, 0), 2);
        let keys: Vec<Range> = map.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                Range::of(0, 0, 2, 0),
                Range::of(0, 0, 1, 0),
                Range::of(0, 5, 0, 7),
            ]
        );
    }

    #[test]
    fn test_nearest_tie_break() {
        let mut map = NestedRangeMap::new();
        map.insert(Range::of(0, 0, 10, 0), 1);
        map.insert(Range::of(0, 0, 6, 0), 2);
        let (range, value) = map
            .find_nearest_containing(Range::of(1, 13, 1, 13))
            .unwrap();
        assert_eq!((range, *value), (Range::of(0, 0, 6, 0), 2));
    }
}
