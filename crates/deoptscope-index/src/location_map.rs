//! File-sharded range container

use crate::range_map::RangeMap;
use deoptscope_core::{FileId, Location, Range};
use std::collections::BTreeMap;
use tracing::trace;

/// A mapping from [`Location`] (file plus range) to `V`.
///
/// Internally one [`RangeMap`] shard per file; queries are always scoped to
/// a single file and never cross shards. Shards are created on first insert
/// and dropped the moment they become empty, so iteration never yields an
/// empty shard and `len` counts only live entries. `len` is maintained
/// incrementally because the load pipeline reads it on every mutation.
#[derive(Debug, Clone)]
pub struct LocationMap<V> {
    shards: BTreeMap<FileId, RangeMap<V>>,
    len: usize,
}

impl<V> Default for LocationMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LocationMap<V> {
    /// Create a new empty map
    pub fn new() -> Self {
        Self {
            shards: BTreeMap::new(),
            len: 0,
        }
    }

    /// Exact-key lookup; a file with no shard is simply not found
    pub fn get(&self, location: Location) -> Option<&V> {
        self.shards
            .get(&location.file)?
            .get(location.range)
    }

    /// Exact-key mutable lookup
    pub fn get_mut(&mut self, location: Location) -> Option<&mut V> {
        self.shards
            .get_mut(&location.file)?
            .get_mut(location.range)
    }

    /// Insert a value, creating the file's shard on first touch. Returns the
    /// replaced value for an existing key.
    pub fn insert(&mut self, location: Location, value: V) -> Option<V> {
        let shard = self.shards.entry(location.file).or_insert_with(|| {
            trace!(file = %location.file, "creating shard");
            RangeMap::new()
        });
        let previous = shard.insert(location.range, value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Remove the exact-key entry, dropping the file's shard if it was the
    /// last entry in it
    pub fn remove(&mut self, location: Location) -> Option<V> {
        let shard = self.shards.get_mut(&location.file)?;
        let removed = shard.remove(location.range);
        if removed.is_some() {
            self.len -= 1;
            if shard.is_empty() {
                trace!(file = %location.file, "dropping empty shard");
                self.shards.remove(&location.file);
            }
        }
        removed
    }

    /// Whether an entry with this exact key exists
    pub fn contains_key(&self, location: Location) -> bool {
        self.shards
            .get(&location.file)
            .is_some_and(|shard| shard.contains_key(location.range))
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.shards.clear();
        self.len = 0;
    }

    /// Total number of entries across all shards
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Files with at least one live entry, in ascending id order
    pub fn files(&self) -> impl Iterator<Item = FileId> + '_ {
        self.shards.keys().copied()
    }

    /// The per-file shard, if the file has any entries
    pub fn shard(&self, file: FileId) -> Option<&RangeMap<V>> {
        self.shards.get(&file)
    }

    /// All entries, ascending by file and canonical within each file
    pub fn iter(&self) -> impl Iterator<Item = (Location, &V)> {
        self.shards.iter().flat_map(|(&file, shard)| {
            shard
                .iter()
                .map(move |(range, value)| (Location::new(file, range), value))
        })
    }

    /// All keys, in the same order as [`LocationMap::iter`]
    pub fn keys(&self) -> impl Iterator<Item = Location> + '_ {
        self.iter().map(|(location, _)| location)
    }

    /// All values, in the same order as [`LocationMap::iter`]
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Entries in `file` whose range fully encloses `query`
    pub fn find_all_containing(
        &self,
        file: FileId,
        query: impl Into<Range>,
    ) -> impl Iterator<Item = (Range, &V)> {
        let query = query.into();
        self.shards
            .get(&file)
            .into_iter()
            .flat_map(move |shard| shard.find_all_containing(query))
    }

    /// First containing entry in `file`, in canonical order
    pub fn find_least_containing(
        &self,
        file: FileId,
        query: impl Into<Range>,
    ) -> Option<(Range, &V)> {
        self.shards.get(&file)?.find_least_containing(query)
    }

    /// Tightest enclosing entry in `file`
    pub fn find_nearest_containing(
        &self,
        file: FileId,
        query: impl Into<Range>,
    ) -> Option<(Range, &V)> {
        self.shards.get(&file)?.find_nearest_containing(query)
    }

    /// Entries in `file` nested inside `query`
    pub fn find_all_contained_by(
        &self,
        file: FileId,
        query: impl Into<Range>,
    ) -> impl Iterator<Item = (Range, &V)> {
        let query = query.into();
        self.shards
            .get(&file)
            .into_iter()
            .flat_map(move |shard| shard.find_all_contained_by(query))
    }

    /// First nested entry in `file`, in canonical order
    pub fn find_least_contained_by(
        &self,
        file: FileId,
        query: impl Into<Range>,
    ) -> Option<(Range, &V)> {
        self.shards.get(&file)?.find_least_contained_by(query)
    }

    /// Entries in `file` overlapping `query`, boundary touches included
    pub fn find_all_intersecting(
        &self,
        file: FileId,
        query: impl Into<Range>,
    ) -> impl Iterator<Item = (Range, &V)> {
        let query = query.into();
        self.shards
            .get(&file)
            .into_iter()
            .flat_map(move |shard| shard.find_all_intersecting(query))
    }

    /// First overlapping entry in `file`, in canonical order
    pub fn find_least_intersecting(
        &self,
        file: FileId,
        query: impl Into<Range>,
    ) -> Option<(Range, &V)> {
        self.shards.get(&file)?.find_least_intersecting(query)
    }
}

impl<V> FromIterator<(Location, V)> for LocationMap<V> {
    fn from_iter<I: IntoIterator<Item = (Location, V)>>(iter: I) -> Self {
        let mut map = LocationMap::new();
        for (location, value) in iter {
            map.insert(location, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deoptscope_core::Position;

    fn loc(file: u32, range: Range) -> Location {
        Location::new(FileId(file), range)
    }

    #[test]
    fn test_round_trip_and_replace() {
        let mut map = LocationMap::new();
        let key = loc(1, Range::of(0, 0, 2, 0));
        assert_eq!(map.insert(key, "first"), None);
        assert_eq!(map.get(key), Some(&"first"));
        assert_eq!(map.insert(key, "second"), Some("first"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(key), Some(&"second"));
    }

    #[test]
    fn test_queries_never_cross_files() {
        let mut map = LocationMap::new();
        map.insert(loc(1, Range::of(0, 0, 10, 0)), "in-file-1");
        map.insert(loc(2, Range::of(0, 0, 10, 0)), "in-file-2");

        let hits: Vec<_> = map
            .find_all_containing(FileId(1), Position::new(5, 0))
            .map(|(_, v)| *v)
            .collect();
        assert_eq!(hits, vec!["in-file-1"]);

        // A file with no shard is "not found", never an error.
        assert!(map
            .find_all_containing(FileId(9), Position::new(5, 0))
            .next()
            .is_none());
        assert_eq!(map.find_nearest_containing(FileId(9), Position::new(5, 0)), None);
        assert_eq!(map.get(loc(9, Range::of(0, 0, 10, 0))), None);
    }

    #[test]
    fn test_empty_shard_is_pruned() {
        let mut map = LocationMap::new();
        let key = loc(3, Range::of(1, 0, 1, 5));
        map.insert(key, ());
        map.insert(loc(4, Range::of(0, 0, 0, 1)), ());
        assert_eq!(map.files().collect::<Vec<_>>(), vec![FileId(3), FileId(4)]);

        assert!(map.remove(key).is_some());
        // The last entry's removal drops the whole shard from iteration.
        assert_eq!(map.files().collect::<Vec<_>>(), vec![FileId(4)]);
        assert!(map.shard(FileId(3)).is_none());
        assert_eq!(map.iter().count(), 1);
    }

    #[test]
    fn test_len_incremental_across_files() {
        let mut map = LocationMap::new();
        for file in 0..4u32 {
            for line in 0..5u32 {
                map.insert(loc(file, Range::of(line, 0, line, 9)), (file, line));
            }
        }
        assert_eq!(map.len(), 20);

        // Replacement does not grow the count.
        map.insert(loc(0, Range::of(0, 0, 0, 9)), (9, 9));
        assert_eq!(map.len(), 20);

        assert!(map.remove(loc(2, Range::of(3, 0, 3, 9))).is_some());
        assert!(map.remove(loc(2, Range::of(3, 0, 3, 9))).is_none());
        assert_eq!(map.len(), 19);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.files().count(), 0);
    }

    #[test]
    fn test_iteration_order_is_deterministic() {
        let map: LocationMap<&str> = [
            (loc(2, Range::of(0, 0, 1, 0)), "c"),
            (loc(1, Range::of(4, 0, 5, 0)), "b"),
            (loc(1, Range::of(4, 0, 6, 0)), "a"), // wider end first
        ]
        .into_iter()
        .collect();
        let values: Vec<_> = map.values().copied().collect();
        assert_eq!(values, vec!["a", "b", "c"]);
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys[0], loc(1, Range::of(4, 0, 6, 0)));
    }

    #[test]
    fn test_relocation_between_files() {
        // The pipeline moves an entry once source-map resolution re-keys it
        // from a generated file to the original source file.
        let mut map = LocationMap::new();
        let generated = loc(1, Range::of(10, 0, 10, 40));
        map.insert(generated, "deopt");
        let value = map.remove(generated).unwrap();
        map.insert(loc(2, Range::of(3, 4, 3, 19)), value);

        assert_eq!(map.len(), 1);
        assert!(map.shard(FileId(1)).is_none());
        assert_eq!(
            map.find_least_containing(FileId(2), Position::new(3, 10))
                .map(|(_, v)| *v),
            Some("deopt")
        );
    }
}
