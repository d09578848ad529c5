//! # Wikimark Core
//!
//! Parser for a wiki-style markdown dialect: headings, collapsible sections,
//! tables, nested lists, bold/italic, KaTeX math and typed links.
//!
//! ## Quick Start
//!
//! ```rust
//! use wikimark_core::{parse, Block, Inline};
//!
//! let blocks = parse("# Title\n\nSee [[the docs|https://example.org]].");
//! assert_eq!(blocks.len(), 2);
//! assert!(matches!(&blocks[0], Block::Heading(h) if h.text == "Title"));
//! if let Block::Paragraph(p) = &blocks[1] {
//!     assert_eq!(p.content[1], Inline::link("the docs", "https://example.org"));
//! }
//! ```
//!
//! ## Degradation
//!
//! Parsing never fails. Markup that does not form a construct is kept as
//! text; a span the inline parser gives up on is rendered literally and
//! reported as a diagnostic:
//!
//! ```rust
//! use wikimark_core::Parser;
//!
//! let parser = Parser::new().with_iteration_limit(2);
//! let result = parser.parse_with_diagnostics("*a* *b* *c*");
//! assert_eq!(result.blocks.len(), 1);
//! assert_eq!(result.diagnostics.len(), 1);
//! ```

pub mod ast;
pub mod error;
pub mod inline;
pub mod lexer;
mod list;
pub mod parser;
pub mod span;
pub mod table;

pub use ast::{Block, Cell, Inline, ListItem, Section, UnorderedList};
pub use error::{Diagnostic, DiagnosticKind, Diagnostics};
pub use inline::BareLinks;
pub use parser::{ParseOptions, ParseResult, Parser};

/// Parse a document with default options.
pub fn parse(input: &str) -> Vec<Block> {
    Parser::new().parse(input)
}
