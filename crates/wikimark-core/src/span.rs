//! Byte ranges into the parsed input.
//!
//! The tree itself carries no positions; spans are attached to lines and to
//! diagnostics so a degradation can be traced back to the source text.

/// A byte range in the source text, `[start, end)`.
///
/// # Example
///
/// ```rust
/// use wikimark_core::span::Span;
///
/// let span = Span::new(4, 10);
/// assert_eq!(span.len(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Starting byte offset (inclusive).
    pub start: u32,
    /// Ending byte offset (exclusive).
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Length of this span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Drop `n` leading bytes, clamped to the end of the span.
    #[inline]
    pub fn skip(self, n: u32) -> Span {
        Span {
            start: (self.start + n).min(self.end),
            end: self.end,
        }
    }

    /// Merge two spans into one covering both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}
