//! Zero-based text coordinates

use serde::{Deserialize, Serialize};

/// A zero-based position in a text document.
///
/// Totally ordered by `line`, then `character` (the derived order, given
/// field declaration order).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// Zero-based line number
    pub line: u32,
    /// Zero-based character offset within the line
    pub character: u32,
}

impl Position {
    /// The first position in any document
    pub const ZERO: Position = Position { line: 0, character: 0 };

    /// The greatest representable position, used as an ordering sentinel
    pub const MAX: Position = Position {
        line: u32::MAX,
        character: u32::MAX,
    };

    /// Create a new position
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_line_then_character() {
        assert!(Position::new(1, 0) < Position::new(2, 0));
        assert!(Position::new(1, 5) < Position::new(1, 6));
        assert!(Position::new(1, 99) < Position::new(2, 0));
        assert_eq!(Position::new(3, 4), Position::new(3, 4));
    }

    #[test]
    fn test_sentinels() {
        let p = Position::new(u32::MAX, 17);
        assert!(Position::ZERO <= p);
        assert!(p <= Position::MAX);
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(12, 3).to_string(), "12:3");
    }
}
