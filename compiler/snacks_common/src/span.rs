pub use crate::source::SourceId;

/// A byte range in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub source_id: SourceId,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(source_id: SourceId, start: usize, end: usize) -> Self {
        Self {
            source_id,
            start,
            end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_invalid(&self) -> bool {
        self.source_id == SourceId::INVALID
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns the smallest span covering both spans.
    pub fn to(&self, other: Span) -> Span {
        Span {
            source_id: self.source_id,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self {
            source_id: SourceId::INVALID,
            start: 0,
            end: 0,
        }
    }
}

/// A trait for nodes which carry a span.
pub trait Spanned {
    fn span(&self) -> Span;
}
