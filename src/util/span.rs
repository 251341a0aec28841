use std::ops::Range;

use miette::SourceSpan;

/// A byte range in the source code
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering a single character starting at `start`
    pub fn single(start: usize, c: char) -> Self {
        Self::new(start, start + c.len_utf8())
    }

    /// Empty span, e.g. to mark the end of input
    pub fn marker(at: usize) -> Self {
        Self::new(at, at)
    }

    /// Smallest span covering both `self` and `other`
    pub fn to(self, other: Span) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl chumsky::Span for Span {
    type Context = ();
    type Offset = usize;

    fn new(_context: Self::Context, range: Range<Self::Offset>) -> Self {
        Self::new(range.start, range.end)
    }

    fn context(&self) -> Self::Context {}

    fn start(&self) -> Self::Offset {
        self.start
    }

    fn end(&self) -> Self::Offset {
        self.end
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.end - span.start)
    }
}
