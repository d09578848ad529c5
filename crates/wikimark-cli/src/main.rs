//! Wikimark CLI - Parse, validate, and inspect wiki markup documents
//!
//! Usage:
//!   wmcli [OPTIONS] [COMMAND] <FILE>
//!
//! Commands:
//!   parse     Parse and display document structure (default)
//!   validate  Report spans that degraded to literal text
//!   stats     Show document statistics
//!   sections  List sections and their default collapse state

use std::env;
use std::fs;
use std::io;
use std::process;

use serde::Serialize;
use wikimark_core::ast::{self, Table};
use wikimark_core::{BareLinks, Block, Inline, ParseOptions, ParseResult, Parser, UnorderedList};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    match run(&args) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let config = parse_args(args)?;
    let input = read_input(&config.file)?;

    let parser = Parser::with_options(config.options);
    log::debug!(
        "parsing '{}' ({} bytes) with {:?}",
        config.file,
        input.len(),
        config.options
    );
    let result = parser.parse_with_diagnostics(&input);

    match config.command {
        Command::Parse => cmd_parse(&result, &config),
        Command::Validate => cmd_validate(&result, &config),
        Command::Stats => cmd_stats(&result, &input),
        Command::Sections => cmd_sections(&result, &config),
    }
}

fn read_input(file: &str) -> Result<String, String> {
    if file == "-" {
        io::read_to_string(io::stdin()).map_err(|e| format!("failed to read stdin: {}", e))
    } else {
        fs::read_to_string(file).map_err(|e| format!("failed to read '{}': {}", file, e))
    }
}

#[derive(Debug)]
struct Config {
    command: Command,
    file: String,
    format: OutputFormat,
    verbose: bool,
    options: ParseOptions,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Parse,
    Validate,
    Stats,
    Sections,
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_args(args: &[String]) -> Result<Config, String> {
    let mut command = Command::Parse;
    let mut format = OutputFormat::Text;
    let mut verbose = false;
    let mut options = ParseOptions::default();
    let mut file = None;

    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-V" | "--version" => {
                println!("wmcli {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "-v" | "--verbose" => verbose = true,
            "-j" | "--json" => format = OutputFormat::Json,
            "--legacy-links" => options.bare_links = BareLinks::Literal,
            "--max-iterations" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| "--max-iterations requires a value".to_string())?;
                options.max_inline_iterations = value
                    .parse()
                    .map_err(|_| format!("invalid iteration limit: {}", value))?;
            }
            "parse" => command = Command::Parse,
            "validate" => command = Command::Validate,
            "stats" => command = Command::Stats,
            "sections" => command = Command::Sections,
            "-" => file = set_file(file, arg)?,
            _ if arg.starts_with('-') => {
                return Err(format!("unknown option: {}", arg));
            }
            _ => file = set_file(file, arg)?,
        }
        i += 1;
    }

    let file = file.ok_or_else(|| "no input file specified".to_string())?;

    Ok(Config {
        command,
        file,
        format,
        verbose,
        options,
    })
}

fn set_file(current: Option<String>, arg: &str) -> Result<Option<String>, String> {
    if current.is_some() {
        return Err("multiple files specified".to_string());
    }
    Ok(Some(arg.to_string()))
}

fn print_help() {
    eprintln!(
        r#"wmcli - wiki markup parser and inspector

USAGE:
    wmcli [OPTIONS] [COMMAND] <FILE>

COMMANDS:
    parse       Parse and display document structure (default)
    validate    Report spans that degraded to literal text
    stats       Show document statistics
    sections    List sections and whether they start collapsed

OPTIONS:
    -v, --verbose             Show detailed AST structure
    -j, --json                Output in JSON format
        --legacy-links        Keep [[name]] links without '|' as literal text
        --max-iterations <N>  Inline iteration bound (default 2000)
    -h, --help                Print help information
    -V, --version             Print version information

FILE may be '-' to read from standard input. Set RUST_LOG=debug for
parser logging.

EXAMPLES:
    wmcli article.wm            Parse a document
    wmcli -v article.wm         Parse with verbose output
    wmcli -j article.wm         Output AST as JSON
    wmcli validate article.wm   Check for literal-text fallbacks
    cat article.wm | wmcli stats -
"#
    );
}

// =============================================================================
// Parse Command
// =============================================================================

fn cmd_parse(result: &ParseResult, config: &Config) -> Result<(), String> {
    for diagnostic in result.diagnostics.iter() {
        eprintln!("warning: {}", diagnostic);
    }

    match config.format {
        OutputFormat::Json => print_json(&result.blocks),
        OutputFormat::Text => {
            if config.verbose {
                print_blocks_verbose(&result.blocks);
                Ok(())
            } else {
                print_summary(&result.blocks);
                Ok(())
            }
        }
    }
}

// =============================================================================
// Validate Command
// =============================================================================

fn cmd_validate(result: &ParseResult, config: &Config) -> Result<(), String> {
    if result.is_clean() {
        if !matches!(config.format, OutputFormat::Json) {
            println!("Valid: no literal-text fallbacks");
        } else {
            println!(r#"{{"valid": true, "diagnostics": []}}"#);
        }
        return Ok(());
    }

    if matches!(config.format, OutputFormat::Json) {
        let diagnostics: Vec<_> = result
            .diagnostics
            .iter()
            .map(|d| {
                serde_json::json!({
                    "kind": d.kind.as_str(),
                    "message": d.message,
                    "span": d.span.map(|s| serde_json::json!({"start": s.start, "end": s.end})),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({"valid": false, "diagnostics": diagnostics})
        );
    } else {
        eprintln!(
            "Degraded: {} span(s) rendered as literal text",
            result.diagnostics.len()
        );
        for diagnostic in result.diagnostics.iter() {
            eprintln!("  - {}", diagnostic);
        }
    }
    Err(format!("{} diagnostic(s) found", result.diagnostics.len()))
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(result: &ParseResult, input: &str) -> Result<(), String> {
    let stats = DocumentStats::from_blocks(&result.blocks, input);

    println!("Document Statistics");
    println!("-------------------");
    println!("Content:");
    println!("  Total blocks:   {}", stats.total_blocks);
    println!("  Headings:       {}", stats.headings);
    println!("  Sections:       {}", stats.sections);
    println!("  Paragraphs:     {}", stats.paragraphs);
    println!("  Lists:          {}", stats.lists);
    println!("  List items:     {}", stats.list_items);
    println!("  Tables:         {}", stats.tables);
    println!();
    println!("Inline:");
    println!("  Links:          {}", stats.links);
    println!("  Formulas:       {}", stats.formulas);
    println!();
    println!("Size:");
    println!("  Characters:     {}", stats.chars);
    println!("  Words (est.):   {}", stats.words);
    println!("  Lines:          {}", stats.lines);
    println!();
    println!("Diagnostics:    {}", result.diagnostics.len());

    Ok(())
}

#[derive(Default)]
struct DocumentStats {
    total_blocks: usize,
    headings: usize,
    sections: usize,
    paragraphs: usize,
    lists: usize,
    list_items: usize,
    tables: usize,
    links: usize,
    formulas: usize,
    chars: usize,
    words: usize,
    lines: usize,
}

impl DocumentStats {
    fn from_blocks(blocks: &[Block], input: &str) -> Self {
        let mut stats = Self {
            chars: input.chars().count(),
            words: input.split_whitespace().count(),
            lines: input.lines().count(),
            ..Self::default()
        };

        stats.count_blocks(blocks);
        stats
    }

    fn count_blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.total_blocks += 1;
            match block {
                Block::Heading(_) => self.headings += 1,
                Block::Section(s) => {
                    self.sections += 1;
                    self.count_blocks(&s.content);
                }
                Block::Paragraph(p) => {
                    self.paragraphs += 1;
                    self.count_inlines(&p.content);
                }
                Block::List(l) => self.count_list(l),
                Block::Table(t) => {
                    self.tables += 1;
                    for cell in t.head.iter().chain(t.body.iter().flatten()) {
                        self.count_inlines(cell);
                    }
                }
            }
        }
    }

    fn count_list(&mut self, list: &UnorderedList) {
        self.lists += 1;
        for item in &list.items {
            self.list_items += 1;
            self.count_inlines(&item.content);
            if let Some(nested) = &item.nested {
                self.count_list(nested);
            }
        }
    }

    fn count_inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            match inline {
                Inline::Bold(s) | Inline::Italic(s) => self.count_inlines(&s.content),
                Inline::Link(_)
                | Inline::RefLink(_)
                | Inline::ArticleLink(_)
                | Inline::TogglerLink(_) => self.links += 1,
                Inline::KatexBlock(_) | Inline::KatexInline(_) => self.formulas += 1,
                Inline::Text(_) => {}
            }
        }
    }
}

// =============================================================================
// Sections Command
// =============================================================================

fn cmd_sections(result: &ParseResult, config: &Config) -> Result<(), String> {
    let sections = ast::sections(&result.blocks);

    match config.format {
        OutputFormat::Json => {
            let entries: Vec<_> = sections
                .iter()
                .map(|s| serde_json::json!({"name": s.name, "collapsed": s.collapsed}))
                .collect();
            let json = serde_json::to_string_pretty(&entries).map_err(|e| e.to_string())?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("Sections: {}", sections.len());
            for section in sections {
                let state = if section.collapsed {
                    "collapsed"
                } else {
                    "expanded"
                };
                println!("  {} ({})", section.name, state);
            }
        }
    }
    Ok(())
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum JsonBlock<'a> {
    Heading {
        value: &'a str,
    },
    Section {
        name: &'a str,
        collapsed: bool,
        content: Vec<JsonBlock<'a>>,
    },
    Paragraph {
        content: Vec<JsonInline<'a>>,
    },
    List(JsonList<'a>),
    Table {
        head: Vec<Vec<JsonInline<'a>>>,
        body: Vec<Vec<Vec<JsonInline<'a>>>>,
    },
}

#[derive(Serialize)]
struct JsonList<'a> {
    items: Vec<JsonListItem<'a>>,
}

#[derive(Serialize)]
struct JsonListItem<'a> {
    content: Vec<JsonInline<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nested: Option<JsonList<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum JsonInline<'a> {
    Text {
        value: &'a str,
    },
    Bold {
        content: Vec<JsonInline<'a>>,
    },
    Italic {
        content: Vec<JsonInline<'a>>,
    },
    Link {
        caption: &'a str,
        address: &'a str,
    },
    RefLink {
        caption: &'a str,
        path: &'a str,
    },
    ArticleLink {
        caption: &'a str,
        path: &'a str,
    },
    TogglerLink {
        caption: &'a str,
        #[serde(rename = "targetId")]
        target_id: &'a str,
    },
    KatexBlock {
        tex: &'a str,
    },
    KatexInline {
        tex: &'a str,
    },
}

fn print_json(blocks: &[Block]) -> Result<(), String> {
    let json_blocks: Vec<_> = blocks.iter().map(convert_block).collect();
    let json = serde_json::to_string_pretty(&json_blocks).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

fn convert_block(block: &Block) -> JsonBlock<'_> {
    match block {
        Block::Heading(h) => JsonBlock::Heading { value: &h.text },
        Block::Section(s) => JsonBlock::Section {
            name: &s.name,
            collapsed: s.collapsed,
            content: s.content.iter().map(convert_block).collect(),
        },
        Block::Paragraph(p) => JsonBlock::Paragraph {
            content: convert_inlines(&p.content),
        },
        Block::List(l) => JsonBlock::List(convert_list(l)),
        Block::Table(t) => JsonBlock::Table {
            head: t.head.iter().map(|cell| convert_inlines(cell)).collect(),
            body: t
                .body
                .iter()
                .map(|row| row.iter().map(|cell| convert_inlines(cell)).collect())
                .collect(),
        },
    }
}

fn convert_list(list: &UnorderedList) -> JsonList<'_> {
    JsonList {
        items: list
            .items
            .iter()
            .map(|item| JsonListItem {
                content: convert_inlines(&item.content),
                nested: item.nested.as_ref().map(convert_list),
            })
            .collect(),
    }
}

fn convert_inlines(inlines: &[Inline]) -> Vec<JsonInline<'_>> {
    inlines.iter().map(convert_inline).collect()
}

fn convert_inline(inline: &Inline) -> JsonInline<'_> {
    match inline {
        Inline::Text(t) => JsonInline::Text { value: &t.value },
        Inline::Bold(s) => JsonInline::Bold {
            content: convert_inlines(&s.content),
        },
        Inline::Italic(s) => JsonInline::Italic {
            content: convert_inlines(&s.content),
        },
        Inline::Link(l) => JsonInline::Link {
            caption: &l.caption,
            address: &l.address,
        },
        Inline::RefLink(l) => JsonInline::RefLink {
            caption: &l.caption,
            path: &l.path,
        },
        Inline::ArticleLink(l) => JsonInline::ArticleLink {
            caption: &l.caption,
            path: &l.path,
        },
        Inline::TogglerLink(l) => JsonInline::TogglerLink {
            caption: &l.caption,
            target_id: &l.target_id,
        },
        Inline::KatexBlock(m) => JsonInline::KatexBlock { tex: &m.tex },
        Inline::KatexInline(m) => JsonInline::KatexInline { tex: &m.tex },
    }
}

// =============================================================================
// Text Output
// =============================================================================

fn print_summary(blocks: &[Block]) {
    println!("Blocks: {}", blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        println!("  [{}] {}", i + 1, describe_block(block));
    }
}

fn print_blocks_verbose(blocks: &[Block]) {
    println!("=== Wikimark AST ===");
    for (i, block) in blocks.iter().enumerate() {
        println!();
        println!("[{}] {}", i + 1, describe_block(block));
        print_block_verbose(block, 1);
    }
}

fn describe_block(block: &Block) -> String {
    match block {
        Block::Heading(h) => format!("Heading: {}", h.text),
        Block::Section(s) => format!(
            "Section '{}' ({}, {} blocks)",
            s.name,
            if s.collapsed { "collapsed" } else { "expanded" },
            s.content.len()
        ),
        Block::Paragraph(p) => format!("Paragraph ({} inlines)", p.content.len()),
        Block::List(l) => format!("List ({} items)", l.items.len()),
        Block::Table(t) => describe_table(t),
    }
}

fn describe_table(table: &Table) -> String {
    format!(
        "Table ({} columns, {} body rows)",
        table.head.len(),
        table.body.len()
    )
}

fn print_block_verbose(block: &Block, indent: usize) {
    let prefix = "  ".repeat(indent);

    match block {
        Block::Heading(_) => {}
        Block::Section(s) => {
            for (i, block) in s.content.iter().enumerate() {
                println!("{}[{}] {}", prefix, i + 1, describe_block(block));
                print_block_verbose(block, indent + 1);
            }
        }
        Block::Paragraph(p) => {
            println!("{}Content: {}", prefix, format_inlines(&p.content));
        }
        Block::List(l) => print_list_verbose(l, indent),
        Block::Table(t) => {
            let head: Vec<String> = t.head.iter().map(|c| format_inlines(c)).collect();
            println!("{}Head: {}", prefix, head.join(" | "));
            for (i, row) in t.body.iter().enumerate() {
                let cells: Vec<String> = row.iter().map(|c| format_inlines(c)).collect();
                println!("{}Row {}: {}", prefix, i + 1, cells.join(" | "));
            }
        }
    }
}

fn print_list_verbose(list: &UnorderedList, indent: usize) {
    let prefix = "  ".repeat(indent);
    for (i, item) in list.items.iter().enumerate() {
        println!("{}Item {}: {}", prefix, i + 1, format_inlines(&item.content));
        if let Some(nested) = &item.nested {
            print_list_verbose(nested, indent + 1);
        }
    }
}

fn format_inlines(inlines: &[Inline]) -> String {
    let mut result = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(t) => result.push_str(&t.value.replace('\n', "\\n")),
            Inline::Italic(s) => {
                result.push('*');
                result.push_str(&format_inlines(&s.content));
                result.push('*');
            }
            Inline::Bold(s) => {
                result.push_str("__");
                result.push_str(&format_inlines(&s.content));
                result.push_str("__");
            }
            Inline::Link(l) => push_link(&mut result, &l.caption, &l.address),
            Inline::RefLink(l) => {
                push_link(&mut result, &l.caption, &format!("reference:{}", l.path))
            }
            Inline::ArticleLink(l) => push_link(&mut result, &l.caption, &l.path),
            Inline::TogglerLink(l) => {
                push_link(&mut result, &l.caption, &format!("toggle:{}", l.target_id))
            }
            Inline::KatexBlock(m) => {
                result.push_str("$$");
                result.push_str(&m.tex);
                result.push_str("$$");
            }
            Inline::KatexInline(m) => {
                result.push('$');
                result.push_str(&m.tex);
                result.push('$');
            }
        }
    }
    result
}

fn push_link(out: &mut String, caption: &str, target: &str) {
    out.push_str("[[");
    out.push_str(caption);
    out.push('|');
    out.push_str(target);
    out.push_str("]]");
}
