//! Line-driven block parser.
//!
//! Lines that no block recognizer accepts are buffered as paragraph text.
//! A successful recognizer first flushes that buffer as a paragraph, so a
//! heading, section, table or list always ends the preceding paragraph.
//! Parsing is total: malformed markup degrades to paragraph text.

use crate::ast::{Block, Heading, Inline, Paragraph, Section};
use crate::error::{Diagnostic, Diagnostics};
use crate::inline::{BareLinks, InlineParser, DEFAULT_ITERATION_LIMIT};
use crate::lexer::{Lexer, Line};
use crate::span::Span;

/// Prefix that places a line inside the preceding section.
const SECTION_INDENT: &str = "    ";

/// Deepest section or list nesting the parser follows. A construct opened
/// below it is not recognized and its lines stay text.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Bound on recognizer invocations per inline run. A run that does not
    /// finish within the bound is rendered as literal text.
    pub max_inline_iterations: usize,
    /// Treatment of `[[name]]` links without a caption separator.
    pub bare_links: BareLinks,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_inline_iterations: DEFAULT_ITERATION_LIMIT,
            bare_links: BareLinks::default(),
        }
    }
}

/// Parsed blocks together with the degradations that occurred.
#[derive(Debug)]
pub struct ParseResult {
    pub blocks: Vec<Block>,
    pub diagnostics: Diagnostics,
}

impl ParseResult {
    /// True if no span had to be rendered as literal text.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Wiki markup parser.
///
/// Holds only configuration; every call builds its own state, so one parser
/// can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Set the inline iteration bound.
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.options.max_inline_iterations = limit;
        self
    }

    /// Select how `[[name]]` links without `|` are treated.
    pub fn with_bare_links(mut self, bare_links: BareLinks) -> Self {
        self.options.bare_links = bare_links;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a document. Never fails.
    pub fn parse(&self, input: &str) -> Vec<Block> {
        self.parse_with_diagnostics(input).blocks
    }

    /// Parse a document and report where literal-text fallbacks happened.
    pub fn parse_with_diagnostics(&self, input: &str) -> ParseResult {
        let lines: Vec<Line<'_>> = Lexer::new(input).collect();
        let mut parser = BlockParser::new(&self.options);
        let blocks = parser.parse_blocks(&lines);

        log::debug!(
            "parsed {} lines into {} blocks ({} diagnostics)",
            lines.len(),
            blocks.len(),
            parser.diagnostics.len()
        );

        ParseResult {
            blocks,
            diagnostics: parser.diagnostics,
        }
    }

    /// Parse pre-split lines. Diagnostics spans are not meaningful here, so
    /// only the tree is returned.
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Block> {
        let lines: Vec<Line<'_>> = lines.iter().map(|l| Line::detached(l.as_ref())).collect();
        BlockParser::new(&self.options).parse_blocks(&lines)
    }
}

/// Outcome of a block recognizer: the node (none for a skipped blank line)
/// and the lines after it.
pub(crate) type Recognized<'l, 'a> = (Option<Block>, &'l [Line<'a>]);

type BlockRecognizer =
    for<'l, 'a> fn(&mut BlockParser, &'l [Line<'a>]) -> Option<Recognized<'l, 'a>>;

/// Per-call parsing state shared by the block, list and table parsers.
pub(crate) struct BlockParser {
    pub(crate) inline: InlineParser,
    pub(crate) diagnostics: Diagnostics,
    section_depth: usize,
}

impl BlockParser {
    /// Block recognizers in priority order.
    const RECOGNIZERS: [BlockRecognizer; 5] = [
        Self::heading,
        Self::section,
        Self::table,
        Self::list,
        Self::blank_line,
    ];

    pub(crate) fn new(options: &ParseOptions) -> Self {
        Self {
            inline: InlineParser::new(options.max_inline_iterations, options.bare_links),
            diagnostics: Diagnostics::new(),
            section_depth: 0,
        }
    }

    pub(crate) fn parse_blocks<'a>(&mut self, lines: &[Line<'a>]) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut pending: Vec<Line<'a>> = Vec::new();
        let mut rest = lines;

        while let Some((line, after)) = rest.split_first() {
            match self.recognize(rest) {
                Some((block, remaining)) => {
                    self.flush_paragraph(&mut pending, &mut blocks);
                    blocks.extend(block);
                    rest = remaining;
                }
                None => {
                    pending.push(*line);
                    rest = after;
                }
            }
        }

        self.flush_paragraph(&mut pending, &mut blocks);
        blocks
    }

    fn recognize<'l, 'a>(&mut self, lines: &'l [Line<'a>]) -> Option<Recognized<'l, 'a>> {
        for recognize in Self::RECOGNIZERS {
            if let Some(found) = recognize(self, lines) {
                return Some(found);
            }
        }
        None
    }

    fn heading<'l, 'a>(&mut self, lines: &'l [Line<'a>]) -> Option<Recognized<'l, 'a>> {
        let (line, after) = lines.split_first()?;
        let text = line.text.strip_prefix("# ")?;
        let heading = Heading {
            text: text.to_string(),
        };
        Some((Some(Block::Heading(heading)), after))
    }

    fn section<'l, 'a>(&mut self, lines: &'l [Line<'a>]) -> Option<Recognized<'l, 'a>> {
        let (header, after) = lines.split_first()?;
        let (collapsed, name) = if let Some(name) = header.text.strip_prefix("^ ") {
            (false, name)
        } else if let Some(name) = header.text.strip_prefix("_ ") {
            (true, name)
        } else {
            return None;
        };
        if name.is_empty() {
            return None;
        }

        let body_len = after
            .iter()
            .take_while(|l| l.starts_with(SECTION_INDENT))
            .count();
        if body_len == 0 {
            return None;
        }
        if self.section_depth == MAX_NESTING_DEPTH {
            self.nesting_exceeded("section", header);
            return None;
        }

        let body: Vec<Line<'a>> = after[..body_len]
            .iter()
            .filter_map(|l| l.strip_prefix(SECTION_INDENT))
            .collect();
        self.section_depth += 1;
        let content = self.parse_blocks(&body);
        self.section_depth -= 1;

        let section = Section {
            name: name.to_string(),
            collapsed,
            content,
        };
        Some((Some(Block::Section(section)), &after[body_len..]))
    }

    fn list<'l, 'a>(&mut self, lines: &'l [Line<'a>]) -> Option<Recognized<'l, 'a>> {
        let (list, rest) = self.parse_list(lines, 1)?;
        Some((Some(Block::List(list)), rest))
    }

    fn blank_line<'l, 'a>(&mut self, lines: &'l [Line<'a>]) -> Option<Recognized<'l, 'a>> {
        let (line, after) = lines.split_first()?;
        line.is_blank().then_some((None, after))
    }

    fn flush_paragraph(&mut self, pending: &mut Vec<Line<'_>>, blocks: &mut Vec<Block>) {
        let span = match (pending.first(), pending.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => return,
        };

        let text = pending
            .iter()
            .map(|l| l.text)
            .collect::<Vec<_>>()
            .join("\n");
        pending.clear();

        let content = self.inline_or_literal(&text, span, "paragraph");
        blocks.push(Block::Paragraph(Paragraph { content }));
    }

    /// Record a `context` construct at `line` that opened below
    /// [`MAX_NESTING_DEPTH`].
    pub(crate) fn nesting_exceeded(&mut self, context: &str, line: &Line<'_>) {
        log::warn!(
            "{} at bytes {}..{} nested deeper than {} levels",
            context,
            line.span.start,
            line.span.end,
            MAX_NESTING_DEPTH
        );
        self.diagnostics.push(Diagnostic::nesting_limit(
            context,
            MAX_NESTING_DEPTH,
            Some(line.span),
        ));
    }

    /// Inline-parse `text`, falling back to a single literal text node when
    /// the iteration bound is exceeded.
    pub(crate) fn inline_or_literal(&mut self, text: &str, span: Span, context: &str) -> Vec<Inline> {
        match self.inline.parse_line(text) {
            Some(content) => content,
            None => {
                let limit = self.inline.limit();
                log::warn!(
                    "{} at bytes {}..{} exceeded {} inline iterations",
                    context,
                    span.start,
                    span.end,
                    limit
                );
                self.diagnostics
                    .push(Diagnostic::iteration_limit(context, limit, Some(span)));
                literal(text)
            }
        }
    }
}

/// `text` as inline content with no markup applied.
pub(crate) fn literal(text: &str) -> Vec<Inline> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Inline::text(text)]
    }
}
