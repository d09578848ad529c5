//! Inline parser for paragraph, list item and table cell text.
//!
//! Ordered choice over a fixed recognizer list: at every position the
//! recognizers are tried in priority order and the first match wins. A
//! recognizer that fails consumes nothing, so the span falls through to the
//! next one and ultimately to plain text. Special characters are located
//! with `memchr`.

use memchr::memchr3;

use crate::ast::Inline;

/// Default bound on recognizer invocations per inline run.
pub const DEFAULT_ITERATION_LIMIT: usize = 2000;

/// Delimiters an inline run may stop at. End of input always stops a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Table cell boundary.
    Pipe,
    /// Closes an italic span.
    Asterisk,
    /// Closes a bold span.
    DoubleUnderscore,
}

impl Delimiter {
    #[inline]
    pub const fn token(self) -> &'static str {
        match self {
            Delimiter::Pipe => "|",
            Delimiter::Asterisk => "*",
            Delimiter::DoubleUnderscore => "__",
        }
    }
}

/// Treatment of `[[name]]` links without a `|` separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BareLinks {
    /// Self-referential article link: caption and path are both `name`.
    #[default]
    ArticleLink,
    /// Older documents: keep the brackets as literal text.
    Literal,
}

/// Result of one inline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRun<'t> {
    pub content: Vec<Inline>,
    /// The delimiter that ended the run, `None` for end of input.
    pub stop: Option<Delimiter>,
    /// Text following the stop delimiter.
    pub rest: &'t str,
}

type Recognizer = for<'t> fn(&InlineParser, &'t str, &[Delimiter]) -> Option<(Inline, &'t str)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineParser {
    limit: usize,
    bare_links: BareLinks,
}

impl Default for InlineParser {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATION_LIMIT, BareLinks::default())
    }
}

impl InlineParser {
    /// Recognizers in priority order. Plain text is the implicit last entry.
    const RECOGNIZERS: [Recognizer; 5] = [
        Self::link,
        Self::katex_block,
        Self::katex_inline,
        Self::bold,
        Self::italic,
    ];

    pub fn new(limit: usize, bare_links: BareLinks) -> Self {
        Self { limit, bare_links }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Parse `text` up to end of input.
    ///
    /// Returns `None` only if the iteration bound was exceeded.
    pub fn parse_line(&self, text: &str) -> Option<Vec<Inline>> {
        self.parse_until(text, &[]).map(|run| run.content)
    }

    /// Parse `text` until one of `stops` or end of input.
    ///
    /// The stop delimiter is consumed. Returns `None` if no stop was reached
    /// within the iteration bound.
    pub fn parse_until<'t>(&self, text: &'t str, stops: &[Delimiter]) -> Option<InlineRun<'t>> {
        let mut content = Vec::new();
        let mut rest = text;
        let mut iterations = 0;

        loop {
            if rest.is_empty() {
                return Some(InlineRun {
                    content,
                    stop: None,
                    rest,
                });
            }
            if let Some(stop) = stops.iter().copied().find(|d| rest.starts_with(d.token())) {
                return Some(InlineRun {
                    content,
                    stop: Some(stop),
                    rest: &rest[stop.token().len()..],
                });
            }
            if iterations == self.limit {
                return None;
            }
            iterations += 1;

            let (node, remaining) = self.next_inline(rest, stops);
            push_merged(&mut content, node);
            rest = remaining;
        }
    }

    fn next_inline<'t>(&self, text: &'t str, stops: &[Delimiter]) -> (Inline, &'t str) {
        Self::RECOGNIZERS
            .iter()
            .find_map(|recognize| recognize(self, text, stops))
            .unwrap_or_else(|| plain_text(text, stops))
    }

    fn link<'t>(&self, text: &'t str, _stops: &[Delimiter]) -> Option<(Inline, &'t str)> {
        let inner = text.strip_prefix("[[")?;
        let close = inner.find("]]")?;
        let contents = &inner[..close];
        let rest = &inner[close + 2..];

        let node = match contents.split_once('|') {
            Some((caption, address)) => classify_link(caption, address),
            None => match self.bare_links {
                BareLinks::ArticleLink if !contents.is_empty() => {
                    Inline::article_link(contents, contents)
                }
                _ => return None,
            },
        };
        Some((node, rest))
    }

    fn katex_block<'t>(&self, text: &'t str, _stops: &[Delimiter]) -> Option<(Inline, &'t str)> {
        let (tex, rest) = between(text, "$$")?;
        Some((Inline::katex_block(tex), rest))
    }

    fn katex_inline<'t>(&self, text: &'t str, _stops: &[Delimiter]) -> Option<(Inline, &'t str)> {
        let (tex, rest) = between(text, "$")?;
        Some((Inline::katex_inline(tex), rest))
    }

    fn bold<'t>(&self, text: &'t str, stops: &[Delimiter]) -> Option<(Inline, &'t str)> {
        let inner = text.strip_prefix("__")?;
        let (content, rest) = self.styled(inner, stops, Delimiter::DoubleUnderscore)?;
        Some((Inline::bold(content), rest))
    }

    fn italic<'t>(&self, text: &'t str, stops: &[Delimiter]) -> Option<(Inline, &'t str)> {
        let inner = text.strip_prefix('*')?;
        let (content, rest) = self.styled(inner, stops, Delimiter::Asterisk)?;
        Some((Inline::italic(content), rest))
    }

    /// Parse emphasis content up to `close`. Fails if the run ended at an
    /// outer stop or end of input instead, or if the content is empty.
    fn styled<'t>(
        &self,
        inner: &'t str,
        stops: &[Delimiter],
        close: Delimiter,
    ) -> Option<(Vec<Inline>, &'t str)> {
        let mut nested = Vec::with_capacity(stops.len() + 1);
        nested.push(close);
        nested.extend_from_slice(stops);

        let run = self.parse_until(inner, &nested)?;
        if run.stop != Some(close) || run.content.is_empty() {
            return None;
        }
        Some((run.content, run.rest))
    }
}

/// Append `node`, folding it into a preceding text node when both are text.
pub fn push_merged(content: &mut Vec<Inline>, node: Inline) {
    if let Inline::Text(next) = &node {
        if let Some(Inline::Text(prev)) = content.last_mut() {
            prev.value.push_str(&next.value);
            return;
        }
    }
    content.push(node);
}

fn classify_link(caption: &str, address: &str) -> Inline {
    if let Some(path) = address.strip_prefix("reference:") {
        Inline::ref_link(caption, path)
    } else if let Some(target) = address.strip_prefix("toggle:") {
        Inline::toggler_link(caption, target)
    } else if address.starts_with("http://") || address.starts_with("https://") {
        Inline::link(caption, address)
    } else {
        Inline::article_link(caption, unescape_path(address))
    }
}

/// Resolve backslash escapes in an article path: `\\` is a backslash, any
/// other escaped character stands for itself, a trailing lone backslash is
/// dropped.
pub fn unescape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped) => out.push(escaped),
            None => break,
        }
    }
    out
}

/// Non-empty content between an opening and the next closing `delimiter`.
fn between<'t>(text: &'t str, delimiter: &str) -> Option<(&'t str, &'t str)> {
    let inner = text.strip_prefix(delimiter)?;
    let end = inner.find(delimiter)?;
    if end == 0 {
        return None;
    }
    Some((&inner[..end], &inner[end + delimiter.len()..]))
}

/// Fallback recognizer; always consumes at least one character.
fn plain_text<'t>(text: &'t str, stops: &[Delimiter]) -> (Inline, &'t str) {
    if let Some(escaped) = text.strip_prefix('\\') {
        return match escaped.chars().next() {
            Some(c) => (Inline::text(c), &escaped[c.len_utf8()..]),
            None => (Inline::text("\\"), escaped),
        };
    }

    let end = match next_boundary(text, stops) {
        // A special character no recognizer accepted stands for itself.
        0 => text.chars().next().map_or(0, char::len_utf8),
        end => end,
    };
    (Inline::text(&text[..end]), &text[end..])
}

/// Byte offset of the next special character or active stop delimiter.
///
/// `*`, `_` and `$` always end a text run, so the scan for the rarer
/// characters never looks past the first of them.
#[inline]
fn next_boundary(text: &str, stops: &[Delimiter]) -> usize {
    let bytes = text.as_bytes();
    let pipe_stops = stops.contains(&Delimiter::Pipe);
    let limit = memchr3(b'*', b'_', b'$', bytes).unwrap_or(bytes.len());
    let mut from = 0;

    while let Some(offset) = memchr3(b'\\', b'[', b'|', &bytes[from..limit]) {
        let pos = from + offset;
        let is_boundary = match bytes[pos] {
            b'[' => bytes.get(pos + 1) == Some(&b'['),
            b'|' => pipe_stops,
            _ => true,
        };
        if is_boundary {
            return pos;
        }
        from = pos + 1;
    }

    limit
}
