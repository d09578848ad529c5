//! Diagnostics for literal-text degradations.
//!
//! Parsing never fails. When the inline parser gives up on a span, or a
//! section or list nests deeper than the parser follows, the span is
//! rendered as literal text and a [`Diagnostic`] records where it
//! happened. Markup that simply does not match a construct (an unclosed `*`,
//! a section header without content) is ordinary text, not a diagnostic.

use std::fmt;

use crate::span::Span;

/// Diagnostic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The inline parser hit its iteration bound before reaching a stop.
    IterationLimit,
    /// A section or list was nested deeper than the nesting bound.
    NestingLimit,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::IterationLimit => "iteration-limit",
            DiagnosticKind::NestingLimit => "nesting-limit",
        }
    }
}

/// A recorded degradation with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable message
    pub message: String,
    /// Source location of the span rendered as literal text
    pub span: Option<Span>,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// The inline parser exceeded `limit` iterations inside `context`.
    pub fn iteration_limit(context: &str, limit: usize, span: Option<Span>) -> Self {
        Self {
            message: format!(
                "{} exceeded {} inline iterations, rendered as literal text",
                context, limit
            ),
            span,
            kind: DiagnosticKind::IterationLimit,
        }
    }

    /// A `context` construct opened below `limit` levels of nesting.
    pub fn nesting_limit(context: &str, limit: usize, span: Option<Span>) -> Self {
        Self {
            message: format!(
                "{} nested deeper than {} levels, rendered as literal text",
                context, limit
            ),
            span,
            kind: DiagnosticKind::NestingLimit,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(span) = self.span {
            write!(f, " at bytes {}..{}", span.start, span.end)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Diagnostics collected during one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
