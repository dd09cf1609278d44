use crate::SourcePosition;

/// A span of source text, as a half-open interval
/// `[start_inclusive, end_exclusive)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SourceSpan {
    pub start_inclusive: SourcePosition,
    pub end_exclusive: SourcePosition,
}

impl SourceSpan {
    /// Creates a span from a start and end position.
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self {
            start_inclusive: start,
            end_exclusive: end,
        }
    }

    /// Creates an empty span anchored at a single position.
    pub fn empty(at: SourcePosition) -> Self {
        Self {
            start_inclusive: at,
            end_exclusive: at,
        }
    }

    /// Returns a span covering both `self` and `other`.
    pub fn merge(&self, other: &SourceSpan) -> SourceSpan {
        let start = if self.start_inclusive.byte_offset() <= other.start_inclusive.byte_offset() {
            self.start_inclusive
        } else {
            other.start_inclusive
        };
        let end = if self.end_exclusive.byte_offset() >= other.end_exclusive.byte_offset() {
            self.end_exclusive
        } else {
            other.end_exclusive
        };
        SourceSpan::new(start, end)
    }
}
