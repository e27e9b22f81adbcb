//! File-qualified source locations

use crate::range::Range;
use serde::{Deserialize, Serialize};

/// Opaque identity of a file known to the log pipeline.
///
/// The pipeline interns script names/URIs from the trace log into dense ids;
/// this core never deals in paths.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FileId(pub u32);

impl From<u32> for FileId {
    fn from(id: u32) -> Self {
        FileId(id)
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "file{}", self.0)
    }
}

/// A range within a specific file, the key type of `LocationMap`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File the range belongs to
    pub file: FileId,
    /// Range within the file
    pub range: Range,
}

impl Location {
    /// Create a new location
    pub fn new(file: FileId, range: Range) -> Self {
        Self { file, range }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.file, self.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let loc = Location::new(FileId(3), Range::of(1, 2, 3, 4));
        assert_eq!(loc.to_string(), "file3#1:2-3:4");
    }

    #[test]
    fn test_file_id_ordering() {
        assert!(FileId(1) < FileId(2));
        assert_eq!(FileId::from(7), FileId(7));
    }
}
