//! `*`-marked lists. Depth is the number of leading markers.

use crate::ast::{ListItem, UnorderedList};
use crate::lexer::Line;
use crate::parser::{BlockParser, MAX_NESTING_DEPTH};

const MARKER: &str = "*";

impl BlockParser {
    /// Collect items at `depth`, each optionally followed by a deeper list.
    ///
    /// Returns `None` if the first line does not carry the marker, so the
    /// caller can treat the line as paragraph text.
    pub(crate) fn parse_list<'l, 'a>(
        &mut self,
        lines: &'l [Line<'a>],
        depth: usize,
    ) -> Option<(UnorderedList, &'l [Line<'a>])> {
        let marker = MARKER.repeat(depth);
        if depth > MAX_NESTING_DEPTH {
            if let Some(line) = lines.first().filter(|l| l.starts_with(&marker)) {
                self.nesting_exceeded("list item", line);
            }
            return None;
        }

        let mut items = Vec::new();
        let mut rest = lines;

        while let Some((line, after)) = rest.split_first() {
            let Some(body) = line.strip_prefix(&marker) else {
                break;
            };
            let content = self.inline_or_literal(body.text, body.span, "list item");
            rest = after;

            let nested = match self.parse_list(rest, depth + 1) {
                Some((list, after_nested)) => {
                    rest = after_nested;
                    Some(list)
                }
                None => None,
            };
            items.push(ListItem { content, nested });
        }

        if items.is_empty() {
            None
        } else {
            Some((UnorderedList { items }, rest))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Inline;
    use crate::parser::ParseOptions;

    fn lines<'a>(texts: &[&'a str]) -> Vec<Line<'a>> {
        texts.iter().copied().map(Line::detached).collect()
    }

    fn parse<'l, 'a>(input: &'l [Line<'a>]) -> Option<(UnorderedList, &'l [Line<'a>])> {
        BlockParser::new(&ParseOptions::default()).parse_list(input, 1)
    }

    #[test]
    fn flat_list_stops_at_unmarked_line() {
        let input = lines(&["* one", "* two", "after"]);
        let (list, rest) = parse(&input).unwrap();

        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].content, vec![Inline::text(" one")]);
        assert_eq!(list.items[1].content, vec![Inline::text(" two")]);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].text, "after");
    }

    #[test]
    fn deeper_markers_nest_under_previous_item() {
        let input = lines(&["* a", "** a1", "** a2", "* b"]);
        let (list, rest) = parse(&input).unwrap();

        assert!(rest.is_empty());
        assert_eq!(list.items.len(), 2);
        let nested = list.items[0].nested.as_ref().unwrap();
        assert_eq!(nested.items.len(), 2);
        assert_eq!(nested.items[1].content, vec![Inline::text(" a2")]);
        assert!(list.items[1].nested.is_none());
    }

    #[test]
    fn three_levels() {
        let input = lines(&["* a", "** b", "*** c"]);
        let (list, _) = parse(&input).unwrap();
        let b = list.items[0].nested.as_ref().unwrap();
        let c = b.items[0].nested.as_ref().unwrap();
        assert_eq!(c.items[0].content, vec![Inline::text(" c")]);
    }

    #[test]
    fn remainder_after_marker_is_kept_verbatim() {
        let input = lines(&["* spaced", "*", "*tight"]);
        let (list, _) = parse(&input).unwrap();
        assert_eq!(list.items[0].content, vec![Inline::text(" spaced")]);
        assert!(list.items[1].content.is_empty());
        assert_eq!(list.items[2].content, vec![Inline::text("tight")]);
    }

    #[test]
    fn items_below_nesting_bound_stay_at_deepest_level() {
        let markers: Vec<String> = (1..=MAX_NESTING_DEPTH + 2)
            .map(|n| format!("{} x", MARKER.repeat(n)))
            .collect();
        let input: Vec<Line<'_>> = markers.iter().map(|m| Line::detached(m)).collect();
        let mut parser = BlockParser::new(&ParseOptions::default());
        let (list, rest) = parser.parse_list(&input, 1).unwrap();
        assert!(rest.is_empty());

        let mut deepest = &list;
        for _ in 1..MAX_NESTING_DEPTH {
            deepest = deepest.items[0].nested.as_ref().unwrap();
        }
        assert_eq!(deepest.items.len(), 3);
        assert!(deepest.items.iter().all(|item| item.nested.is_none()));
        assert_eq!(deepest.items[2].content, vec![Inline::text("** x")]);
        assert_eq!(parser.diagnostics.len(), 2);
    }

    #[test]
    fn unmarked_first_line_is_not_a_list() {
        let input = lines(&["plain", "* item"]);
        assert!(parse(&input).is_none());
    }

    #[test]
    fn item_content_is_inline_parsed() {
        let input = lines(&["*__bold__ and $x$"]);
        let (list, _) = parse(&input).unwrap();
        assert_eq!(
            list.items[0].content,
            vec![
                Inline::bold(vec![Inline::text("bold")]),
                Inline::text(" and "),
                Inline::katex_inline("x"),
            ]
        );
    }
}
