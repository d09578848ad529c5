//! Line splitter feeding the block parser.
//!
//! Lines borrow directly from the input and keep their byte span, so
//! dedented section content can still be traced back to the source.
//! Newlines are located with `memchr`.

use memchr::memchr;

use crate::span::Span;

/// A single line from the input with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text (without the line terminator).
    pub text: &'a str,
    /// Byte span in the original input.
    pub span: Span,
}

impl<'a> Line<'a> {
    /// Create a line that is not backed by a lexer (tests, synthetic input).
    pub fn detached(text: &'a str) -> Self {
        Self {
            text,
            span: Span::new(0, text.len() as u32),
        }
    }

    /// Check if this line contains only whitespace.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.text.as_bytes().starts_with(prefix.as_bytes())
    }

    /// Strip a prefix, keeping the span aligned with the remaining text.
    #[inline]
    pub fn strip_prefix(&self, prefix: &str) -> Option<Line<'a>> {
        self.text.strip_prefix(prefix).map(|rest| Line {
            text: rest,
            span: self.span.skip(prefix.len() as u32),
        })
    }
}

/// Iterator over the lines of an input string.
///
/// Both `\n` and `\r\n` terminate a line. A trailing terminator does not
/// produce an extra empty line.
pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Lexer<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self { input, offset: 0 }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.input.len()
    }

    fn read_line(&mut self) -> Option<Line<'a>> {
        if self.is_eof() {
            return None;
        }

        let bytes = self.input.as_bytes();
        let start = self.offset;
        let end = match memchr(b'\n', &bytes[start..]) {
            Some(pos) => start + pos,
            None => bytes.len(),
        };

        let text_end = if end > start && bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };

        self.offset = if end < bytes.len() { end + 1 } else { end };

        // `\n` and `\r` are ASCII, so both slice ends fall on char boundaries.
        Some(Line {
            text: &self.input[start..text_end],
            span: Span::new(start as u32, text_end as u32),
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Line<'a>;

    #[inline]
    fn next(&mut self) -> Option<Line<'a>> {
        self.read_line()
    }
}
