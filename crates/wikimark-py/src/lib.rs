//! Python bindings for the wikimark parser.
//!
//! Trees are returned as plain dicts tagged with `"type"`, the same shape
//! `wmcli -j` prints.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use wikimark_core::{
    span::Span as CoreSpan, BareLinks, Block, Cell, Diagnostic as CoreDiagnostic, Inline,
    ParseOptions, Parser as CoreParser, UnorderedList,
};

// ============================================================================
// Span
// ============================================================================

/// Source location in the input text (byte offsets).
#[pyclass(frozen, get_all, name = "Span")]
#[derive(Clone)]
pub struct PySpan {
    pub start: u32,
    pub end: u32,
}

#[pymethods]
impl PySpan {
    fn __repr__(&self) -> String {
        format!("Span({}, {})", self.start, self.end)
    }

    #[getter]
    fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

impl From<CoreSpan> for PySpan {
    fn from(s: CoreSpan) -> Self {
        PySpan {
            start: s.start,
            end: s.end,
        }
    }
}

// ============================================================================
// Diagnostic
// ============================================================================

/// A span that was rendered as literal text.
#[pyclass(frozen, get_all, name = "Diagnostic")]
#[derive(Clone)]
pub struct PyDiagnostic {
    pub kind: String,
    pub message: String,
    pub span: Option<PySpan>,
}

#[pymethods]
impl PyDiagnostic {
    fn __repr__(&self) -> String {
        format!("Diagnostic(kind={:?}, message={:?})", self.kind, self.message)
    }

    fn __str__(&self) -> String {
        match &self.span {
            Some(span) => format!("{} at bytes {}..{}", self.message, span.start, span.end),
            None => self.message.clone(),
        }
    }
}

impl From<CoreDiagnostic> for PyDiagnostic {
    fn from(d: CoreDiagnostic) -> Self {
        PyDiagnostic {
            kind: d.kind.as_str().to_string(),
            message: d.message,
            span: d.span.map(PySpan::from),
        }
    }
}

// ============================================================================
// Conversion
// ============================================================================

fn node<'py>(py: Python<'py>, kind: &str) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("type", kind)?;
    Ok(dict)
}

fn convert_inlines<'py>(py: Python<'py>, inlines: &[Inline]) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty(py);
    for inline in inlines {
        list.append(convert_inline(py, inline)?)?;
    }
    Ok(list)
}

fn convert_inline<'py>(py: Python<'py>, inline: &Inline) -> PyResult<Bound<'py, PyDict>> {
    let dict = node(py, inline.kind())?;
    match inline {
        Inline::Text(t) => dict.set_item("value", &t.value)?,
        Inline::Bold(s) | Inline::Italic(s) => {
            dict.set_item("content", convert_inlines(py, &s.content)?)?
        }
        Inline::Link(l) => {
            dict.set_item("caption", &l.caption)?;
            dict.set_item("address", &l.address)?;
        }
        Inline::RefLink(l) => {
            dict.set_item("caption", &l.caption)?;
            dict.set_item("path", &l.path)?;
        }
        Inline::ArticleLink(l) => {
            dict.set_item("caption", &l.caption)?;
            dict.set_item("path", &l.path)?;
        }
        Inline::TogglerLink(l) => {
            dict.set_item("caption", &l.caption)?;
            dict.set_item("targetId", &l.target_id)?;
        }
        Inline::KatexBlock(m) | Inline::KatexInline(m) => dict.set_item("tex", &m.tex)?,
    }
    Ok(dict)
}

fn convert_cells<'py>(py: Python<'py>, cells: &[Cell]) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty(py);
    for cell in cells {
        list.append(convert_inlines(py, cell)?)?;
    }
    Ok(list)
}

fn convert_list<'py>(py: Python<'py>, list: &UnorderedList) -> PyResult<Bound<'py, PyList>> {
    let items = PyList::empty(py);
    for item in &list.items {
        let dict = PyDict::new(py);
        dict.set_item("content", convert_inlines(py, &item.content)?)?;
        if let Some(nested) = &item.nested {
            let nested_dict = PyDict::new(py);
            nested_dict.set_item("items", convert_list(py, nested)?)?;
            dict.set_item("nested", nested_dict)?;
        }
        items.append(dict)?;
    }
    Ok(items)
}

fn convert_blocks<'py>(py: Python<'py>, blocks: &[Block]) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty(py);
    for block in blocks {
        list.append(convert_block(py, block)?)?;
    }
    Ok(list)
}

fn convert_block<'py>(py: Python<'py>, block: &Block) -> PyResult<Bound<'py, PyDict>> {
    let dict = node(py, block.kind())?;
    match block {
        Block::Heading(h) => dict.set_item("value", &h.text)?,
        Block::Section(s) => {
            dict.set_item("name", &s.name)?;
            dict.set_item("collapsed", s.collapsed)?;
            dict.set_item("content", convert_blocks(py, &s.content)?)?;
        }
        Block::Paragraph(p) => dict.set_item("content", convert_inlines(py, &p.content)?)?,
        Block::List(l) => dict.set_item("items", convert_list(py, l)?)?,
        Block::Table(t) => {
            dict.set_item("head", convert_cells(py, &t.head)?)?;
            let body = PyList::empty(py);
            for row in &t.body {
                body.append(convert_cells(py, row)?)?;
            }
            dict.set_item("body", body)?;
        }
    }
    Ok(dict)
}

// ============================================================================
// Parser
// ============================================================================

/// Wiki markup parser.
///
/// Args:
///     max_iterations: Inline iteration bound (default 2000, must be positive)
///     legacy_links: Keep `[[name]]` without `|` as literal text
#[pyclass(frozen, name = "Parser")]
pub struct PyParser {
    inner: CoreParser,
}

#[pymethods]
impl PyParser {
    #[new]
    #[pyo3(
        signature = (max_iterations=2000, legacy_links=false),
        text_signature = "(max_iterations=2000, legacy_links=False)"
    )]
    fn new(max_iterations: usize, legacy_links: bool) -> PyResult<Self> {
        if max_iterations == 0 {
            return Err(PyValueError::new_err("max_iterations must be positive"));
        }
        let options = ParseOptions {
            max_inline_iterations: max_iterations,
            bare_links: bare_links(legacy_links),
        };
        Ok(PyParser {
            inner: CoreParser::with_options(options),
        })
    }

    /// Parse a document into a list of block dicts. Never fails on malformed
    /// markup.
    #[pyo3(text_signature = "(self, input)")]
    fn parse<'py>(&self, py: Python<'py>, input: &str) -> PyResult<Bound<'py, PyList>> {
        let blocks = py.allow_threads(|| self.inner.parse(input));
        convert_blocks(py, &blocks)
    }

    /// Parse a document and return `(blocks, diagnostics)`.
    #[pyo3(text_signature = "(self, input)")]
    fn parse_with_diagnostics<'py>(
        &self,
        py: Python<'py>,
        input: &str,
    ) -> PyResult<(Bound<'py, PyList>, Vec<PyDiagnostic>)> {
        let result = py.allow_threads(|| self.inner.parse_with_diagnostics(input));
        let blocks = convert_blocks(py, &result.blocks)?;
        let diagnostics = result
            .diagnostics
            .into_iter()
            .map(PyDiagnostic::from)
            .collect();
        Ok((blocks, diagnostics))
    }

    #[getter]
    fn max_iterations(&self) -> usize {
        self.inner.options().max_inline_iterations
    }

    #[getter]
    fn legacy_links(&self) -> bool {
        self.inner.options().bare_links == BareLinks::Literal
    }

    fn __repr__(&self) -> String {
        format!(
            "Parser(max_iterations={}, legacy_links={})",
            self.max_iterations(),
            if self.legacy_links() { "True" } else { "False" }
        )
    }
}

fn bare_links(legacy_links: bool) -> BareLinks {
    if legacy_links {
        BareLinks::Literal
    } else {
        BareLinks::ArticleLink
    }
}

// ============================================================================
// Module functions
// ============================================================================

/// Parse a wiki markup string.
///
/// Args:
///     input: Document string to parse
///     legacy_links: Keep `[[name]]` without `|` as literal text
///
/// Returns:
///     list[dict]: Block nodes tagged with "type"
#[pyfunction]
#[pyo3(signature = (input, legacy_links=false), text_signature = "(input, legacy_links=False)")]
fn parse<'py>(py: Python<'py>, input: &str, legacy_links: bool) -> PyResult<Bound<'py, PyList>> {
    let parser = CoreParser::new().with_bare_links(bare_links(legacy_links));
    let blocks = py.allow_threads(|| parser.parse(input));
    convert_blocks(py, &blocks)
}

// ============================================================================
// Module
// ============================================================================

/// Wikimark - parser for a wiki-style markdown dialect.
#[pymodule]
fn pywm(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySpan>()?;
    m.add_class::<PyDiagnostic>()?;
    m.add_class::<PyParser>()?;
    m.add_function(wrap_pyfunction!(parse, m)?)?;
    Ok(())
}
