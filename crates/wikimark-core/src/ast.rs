//! Document tree produced by the parser.
//!
//! The tree is plain owned data: it is built once per [`crate::parse`] call,
//! handed to the caller and never touched by the parser again. Block nodes
//! span whole lines; inline nodes live inside paragraphs, list items and
//! table cells.

/// Block-level nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `# ` heading. The text is kept literally.
    Heading(Heading),
    /// Collapsible section with indented content.
    Section(Section),
    /// Run of non-blank lines with inline formatting.
    Paragraph(Paragraph),
    /// `*`-marked list, nesting by marker repetition.
    List(UnorderedList),
    /// `|`-delimited table.
    Table(Table),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub text: String,
}

/// A named section introduced by `^ name` (expanded) or `_ name` (collapsed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    /// Default state from the markup. Runtime toggling belongs to the viewer.
    pub collapsed: bool,
    pub content: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnorderedList {
    pub items: Vec<ListItem>,
}

/// One list entry: inline content, optionally followed by a deeper list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub content: Vec<Inline>,
    pub nested: Option<UnorderedList>,
}

/// Table with a header row and zero or more body rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub head: Vec<Cell>,
    pub body: Vec<Vec<Cell>>,
}

/// Inline content of a single table cell.
pub type Cell = Vec<Inline>;

/// Inline-level nodes.
///
/// Two `Text` nodes never follow each other directly; the inline parser
/// merges consecutive literal runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(Text),
    /// `__bold__`
    Bold(Styled),
    /// `*italic*`
    Italic(Styled),
    /// `[[caption|https://...]]`
    Link(Link),
    /// `[[caption|reference:path]]`
    RefLink(RefLink),
    /// `[[caption|path]]` or `[[path]]`
    ArticleLink(ArticleLink),
    /// `[[caption|toggle:section]]`
    TogglerLink(TogglerLink),
    /// `$$tex$$`
    KatexBlock(Math),
    /// `$tex$`
    KatexInline(Math),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub value: String,
}

/// Content of a bold or italic span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styled {
    pub content: Vec<Inline>,
}

/// External link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub caption: String,
    pub address: String,
}

/// Link into the reference namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefLink {
    pub caption: String,
    pub path: String,
}

/// Link to another article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLink {
    pub caption: String,
    pub path: String,
}

/// Link that toggles the section named `target_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TogglerLink {
    pub caption: String,
    pub target_id: String,
}

/// Raw TeX source handed to the math typesetter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Math {
    pub tex: String,
}

impl Inline {
    pub fn text(value: impl Into<String>) -> Self {
        Inline::Text(Text {
            value: value.into(),
        })
    }

    pub fn bold(content: Vec<Inline>) -> Self {
        Inline::Bold(Styled { content })
    }

    pub fn italic(content: Vec<Inline>) -> Self {
        Inline::Italic(Styled { content })
    }

    pub fn link(caption: impl Into<String>, address: impl Into<String>) -> Self {
        Inline::Link(Link {
            caption: caption.into(),
            address: address.into(),
        })
    }

    pub fn ref_link(caption: impl Into<String>, path: impl Into<String>) -> Self {
        Inline::RefLink(RefLink {
            caption: caption.into(),
            path: path.into(),
        })
    }

    pub fn article_link(caption: impl Into<String>, path: impl Into<String>) -> Self {
        Inline::ArticleLink(ArticleLink {
            caption: caption.into(),
            path: path.into(),
        })
    }

    pub fn toggler_link(caption: impl Into<String>, target_id: impl Into<String>) -> Self {
        Inline::TogglerLink(TogglerLink {
            caption: caption.into(),
            target_id: target_id.into(),
        })
    }

    pub fn katex_block(tex: impl Into<String>) -> Self {
        Inline::KatexBlock(Math { tex: tex.into() })
    }

    pub fn katex_inline(tex: impl Into<String>) -> Self {
        Inline::KatexInline(Math { tex: tex.into() })
    }

    /// Node tag as used in JSON and Python output.
    pub fn kind(&self) -> &'static str {
        match self {
            Inline::Text(_) => "text",
            Inline::Bold(_) => "bold",
            Inline::Italic(_) => "italic",
            Inline::Link(_) => "link",
            Inline::RefLink(_) => "ref-link",
            Inline::ArticleLink(_) => "article-link",
            Inline::TogglerLink(_) => "toggler-link",
            Inline::KatexBlock(_) => "katex-block",
            Inline::KatexInline(_) => "katex-inline",
        }
    }

    /// Visible text of this node: captions for links, TeX source for math.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.write_plain_text(&mut out);
        out
    }

    fn write_plain_text(&self, out: &mut String) {
        match self {
            Inline::Text(t) => out.push_str(&t.value),
            Inline::Bold(s) | Inline::Italic(s) => {
                for inline in &s.content {
                    inline.write_plain_text(out);
                }
            }
            Inline::Link(l) => out.push_str(&l.caption),
            Inline::RefLink(l) => out.push_str(&l.caption),
            Inline::ArticleLink(l) => out.push_str(&l.caption),
            Inline::TogglerLink(l) => out.push_str(&l.caption),
            Inline::KatexBlock(m) | Inline::KatexInline(m) => out.push_str(&m.tex),
        }
    }
}

/// Concatenated visible text of an inline sequence.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        inline.write_plain_text(&mut out);
    }
    out
}

impl Block {
    /// Node tag as used in JSON and Python output.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading(_) => "heading",
            Block::Section(_) => "section",
            Block::Paragraph(_) => "paragraph",
            Block::List(_) => "list",
            Block::Table(_) => "table",
        }
    }
}

/// All sections in document order, depth first.
///
/// Viewers use this to seed their collapsed-state set from each section's
/// default flag.
pub fn sections(blocks: &[Block]) -> Vec<&Section> {
    let mut out = Vec::new();
    collect_sections(blocks, &mut out);
    out
}

fn collect_sections<'b>(blocks: &'b [Block], out: &mut Vec<&'b Section>) {
    for block in blocks {
        if let Block::Section(section) = block {
            out.push(section);
            collect_sections(&section.content, out);
        }
    }
}
