//! Text ranges with an enforced `start <= end` invariant

use crate::error::{Error, Result};
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// An immutable span of text between two [`Position`]s.
///
/// The invariant `start <= end` holds for every constructed value; the
/// fields are private so no later mutation can break it. A range whose
/// endpoints coincide is *collapsed* and represents a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    start: Position,
    end: Position,
}

impl Range {
    /// Create a new range.
    ///
    /// Panics if `start > end`; passing a reversed range is a caller
    /// contract violation. Use [`Range::try_new`] for positions lifted from
    /// untrusted input such as a trace log.
    pub fn new(start: Position, end: Position) -> Self {
        assert!(start <= end, "range start {start} is after end {end}");
        Self { start, end }
    }

    /// Create a new range, rejecting `start > end` as an error.
    pub fn try_new(start: Position, end: Position) -> Result<Self> {
        if start <= end {
            Ok(Self { start, end })
        } else {
            Err(Error::InvalidRange { start, end })
        }
    }

    /// The collapsed range at a single position
    pub fn collapsed(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Shorthand constructor from raw line/character pairs
    pub fn of(start_line: u32, start_character: u32, end_line: u32, end_character: u32) -> Self {
        Self::new(
            Position::new(start_line, start_character),
            Position::new(end_line, end_character),
        )
    }

    /// Start position (inclusive)
    pub fn start(&self) -> Position {
        self.start
    }

    /// End position
    pub fn end(&self) -> Position {
        self.end
    }

    /// Whether this range is a single point
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Whether this range fully encloses `other` (endpoints inclusive)
    pub fn contains(&self, other: Range) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Whether this range encloses the given position
    pub fn contains_position(&self, position: Position) -> bool {
        self.contains(Range::collapsed(position))
    }

    /// Whether this range overlaps `other`, counting boundary touches
    pub fn intersects(&self, other: Range) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

impl From<Position> for Range {
    fn from(position: Position) -> Self {
        Range::collapsed(position)
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_reversed() {
        let err = Range::try_new(Position::new(4, 0), Position::new(3, 9));
        assert!(matches!(err, Err(Error::InvalidRange { .. })));
        assert!(Range::try_new(Position::new(3, 9), Position::new(4, 0)).is_ok());
    }

    #[test]
    #[should_panic(expected = "range start")]
    fn test_new_panics_on_reversed() {
        let _ = Range::new(Position::new(1, 1), Position::new(1, 0));
    }

    #[test]
    fn test_collapsed() {
        let r = Range::collapsed(Position::new(2, 7));
        assert!(r.is_collapsed());
        assert_eq!(r.start(), r.end());
        assert_eq!(Range::from(Position::new(2, 7)), r);
    }

    #[test]
    fn test_contains() {
        let outer = Range::of(5, 0, 6, 10);
        assert!(outer.contains(Range::of(5, 1, 6, 9)));
        assert!(outer.contains(outer));
        assert!(!outer.contains(Range::of(4, 0, 6, 9)));
        assert!(!outer.contains(Range::of(5, 1, 6, 11)));
        assert!(outer.contains_position(Position::new(5, 0)));
        assert!(outer.contains_position(Position::new(6, 10)));
        assert!(!outer.contains_position(Position::new(7, 0)));
    }

    #[test]
    fn test_intersects_boundary_touch() {
        let r = Range::of(5, 0, 6, 10);
        assert!(r.intersects(Range::of(6, 10, 6, 11)));
        assert!(r.intersects(Range::of(4, 0, 5, 0)));
        assert!(!r.intersects(Range::of(6, 11, 7, 0)));
        assert!(!r.intersects(Range::of(3, 0, 3, 1)));
    }
}
