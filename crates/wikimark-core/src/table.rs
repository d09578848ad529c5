//! Table rows and cell splitting.
//!
//! A row is split by running the inline parser with `|` as an extra stop
//! delimiter, so markup inside a cell (links, math) may itself contain `|`
//! as long as the construct closes.

use crate::ast::{Block, Cell, Table};
use crate::error::Diagnostic;
use crate::inline::Delimiter;
use crate::lexer::Line;
use crate::parser::{literal, BlockParser, ParseOptions, Recognized};
use crate::span::Span;

/// Split a single `|`-prefixed row into cells with default options.
///
/// Returns `None` if the row does not start with `|`.
pub fn split_row(row: &str) -> Option<Vec<Cell>> {
    BlockParser::new(&ParseOptions::default()).split_row(&Line::detached(row))
}

impl BlockParser {
    /// Header row plus the maximal run of following `|` rows.
    pub(crate) fn table<'l, 'a>(&mut self, lines: &'l [Line<'a>]) -> Option<Recognized<'l, 'a>> {
        let (first, after) = lines.split_first()?;
        let head = self.split_row(first)?;

        let body_len = after.iter().take_while(|l| l.starts_with("|")).count();
        let body = after[..body_len]
            .iter()
            .filter_map(|row| self.split_row(row))
            .collect();

        Some((Some(Block::Table(Table { head, body })), &after[body_len..]))
    }

    pub(crate) fn split_row(&mut self, row: &Line<'_>) -> Option<Vec<Cell>> {
        let mut remaining = row.text.strip_prefix('|')?;
        let mut cells = Vec::new();

        loop {
            let offset = (row.text.len() - remaining.len()) as u32;
            let span = Span::new(row.span.start + offset, row.span.end);
            let (cell, rest) = self.next_cell(remaining, span);

            // A row ending exactly on `|` leaves nothing behind; don't turn
            // that into an empty last cell.
            if cell.is_empty() && rest.is_empty() {
                break;
            }
            cells.push(cell);
            if rest.is_empty() {
                break;
            }
            remaining = rest;
        }

        Some(cells)
    }

    /// One cell's content and the text after its closing `|`.
    fn next_cell<'t>(&mut self, text: &'t str, span: Span) -> (Cell, &'t str) {
        if let Some(run) = self.inline.parse_until(text, &[Delimiter::Pipe]) {
            return (run.content, run.rest);
        }

        let limit = self.inline.limit();
        log::warn!(
            "table cell at bytes {}..{} exceeded {} inline iterations",
            span.start,
            span.end,
            limit
        );
        self.diagnostics
            .push(Diagnostic::iteration_limit("table cell", limit, Some(span)));

        match text.split_once('|') {
            Some((cell, rest)) => (literal(cell), rest),
            None => (literal(text), ""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Inline;

    fn text_cells(row: &str) -> Vec<Cell> {
        split_row(row).unwrap()
    }

    #[test]
    fn requires_leading_pipe() {
        assert_eq!(split_row("A|B"), None);
    }

    #[test]
    fn trailing_pipe_adds_no_cell() {
        assert_eq!(
            text_cells("|A|B|"),
            vec![vec![Inline::text("A")], vec![Inline::text("B")]]
        );
    }

    #[test]
    fn missing_trailing_pipe_keeps_last_cell() {
        assert_eq!(
            text_cells("|A|B"),
            vec![vec![Inline::text("A")], vec![Inline::text("B")]]
        );
    }

    #[test]
    fn lone_pipe_has_no_cells() {
        assert_eq!(text_cells("|"), Vec::<Cell>::new());
    }

    #[test]
    fn inner_empty_cell_is_kept() {
        assert_eq!(
            text_cells("|A||B|"),
            vec![vec![Inline::text("A")], vec![], vec![Inline::text("B")]]
        );
    }

    #[test]
    fn double_trailing_pipe_adds_no_cell() {
        assert_eq!(text_cells("|A||"), vec![vec![Inline::text("A")]]);
    }

    #[test]
    fn link_may_contain_pipe() {
        assert_eq!(
            text_cells("|[[caption|https://example.org]]|x|"),
            vec![
                vec![Inline::link("caption", "https://example.org")],
                vec![Inline::text("x")],
            ]
        );
    }

    #[test]
    fn unclosed_italic_stops_at_cell_boundary() {
        assert_eq!(
            text_cells("|*A|B*|"),
            vec![vec![Inline::text("*A")], vec![Inline::text("B*")]]
        );
    }

    #[test]
    fn unclosed_bold_stops_at_cell_boundary() {
        assert_eq!(
            text_cells("|__a|b__|"),
            vec![vec![Inline::text("__a")], vec![Inline::text("b__")]]
        );
    }

    #[test]
    fn iteration_limit_degrades_cell_to_literal() {
        let options = ParseOptions {
            max_inline_iterations: 1,
            ..ParseOptions::default()
        };
        let mut parser = BlockParser::new(&options);
        let cells = parser.split_row(&Line::detached("|*a* b|c|")).unwrap();

        assert_eq!(
            cells,
            vec![vec![Inline::text("*a* b")], vec![Inline::text("c")]]
        );
        assert_eq!(parser.diagnostics.len(), 1);
    }
}
