//! Source positions for nodes and alerts.
//!
//! Every syntax node carries a [`Span`] so the analyzer can point alerts at
//! the offending source without keeping the token stream around.

use std::fmt;

/// A location in a source file, anchored at its first character.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a new span from a line, column, and length.
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    /// Whether this span covers no source text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this span was never given a position (synthesized nodes).
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }

    /// Extend this span so it reaches the end of `end`.
    ///
    /// Spans on different lines keep the start position and add the
    /// lengths, which is enough for pointing at a run of statements.
    #[inline]
    pub fn to(self, end: Span) -> Span {
        if end.is_synthetic() {
            return self;
        }
        if self.is_synthetic() {
            return end;
        }
        if self.line == end.line {
            let start = self.col.min(end.col);
            let stop = (end.col + end.len).max(self.col + self.len);
            Span::new(self.line, start, stop - start)
        } else {
            Span::new(self.line, self.col, self.len + end.len)
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}+{}", self.line, self.col, self.len)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
