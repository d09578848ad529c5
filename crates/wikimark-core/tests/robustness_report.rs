use wikimark_core::{Block, Inline, Parser, UnorderedList};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Counts {
    headings: u32,
    sections: u32,
    paragraphs: u32,
    lists: u32,
    list_items: u32,
    tables: u32,
    links: u32,
    math: u32,
}

impl Counts {
    fn total(self) -> u32 {
        self.headings
            + self.sections
            + self.paragraphs
            + self.lists
            + self.list_items
            + self.tables
            + self.links
            + self.math
    }
}

type MutationList = &'static [&'static str];

struct Lcg {
    state: u64,
}

const SEED: u64 = 0x5eed;
const MAX_MUTATION_STEPS: usize = 3;
const VARIANT_COUNT: usize = 16;

const MUTATIONS: MutationList = &[
    "drop_indent",
    "drop_link_close",
    "drop_math_close",
    "drop_bold_close",
    "drop_table_bar",
    "drop_blank_line",
    "strip_list_marker",
    "truncate_tail",
    "stray_markers",
];

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn choose(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u32() as usize) % max
    }
}

fn apply_mutations(mut input: String, mutations: &[&str], rng: &mut Lcg) -> String {
    let steps = std::cmp::min(MAX_MUTATION_STEPS, mutations.len());
    for _ in 0..steps {
        let pick = rng.choose(mutations.len());
        match mutations[pick] {
            "drop_indent" => {
                if let Some(pos) = input.find("\n    ") {
                    input.replace_range(pos..pos + 5, "\n");
                }
            }
            "drop_link_close" => {
                if let Some(pos) = input.find("]]") {
                    input.replace_range(pos..pos + 2, "");
                }
            }
            "drop_math_close" => {
                if let Some(pos) = input.rfind('$') {
                    input.replace_range(pos..pos + 1, "");
                }
            }
            "drop_bold_close" => {
                if let Some(pos) = input.rfind("__") {
                    input.replace_range(pos..pos + 2, "");
                }
            }
            "drop_table_bar" => {
                if let Some(pos) = input.find("\n|") {
                    input.replace_range(pos..pos + 2, "\n");
                }
            }
            "drop_blank_line" => {
                if let Some(pos) = input.find("\n\n") {
                    input.replace_range(pos..pos + 2, "\n");
                }
            }
            "strip_list_marker" => {
                if let Some(pos) = input.find("\n* ") {
                    input.replace_range(pos..pos + 3, "\n");
                }
            }
            "truncate_tail" => {
                let len = input.len();
                if len > 8 {
                    let cut = rng.choose(len / 4).max(1);
                    input.truncate(len - cut);
                }
            }
            "stray_markers" => {
                let pos = rng.choose(input.len());
                input.insert_str(pos, "*_[[$\\|");
            }
            _ => {}
        }
    }
    input
}

fn generate_variants(input: &str, seed: u64, mutations: MutationList) -> Vec<String> {
    let mut rng = Lcg::new(seed);
    (0..VARIANT_COUNT)
        .map(|_| apply_mutations(input.to_string(), mutations, &mut rng))
        .collect()
}

fn count_inlines(inlines: &[Inline], counts: &mut Counts) {
    for pair in inlines.windows(2) {
        assert!(
            !matches!(pair, [Inline::Text(_), Inline::Text(_)]),
            "adjacent text nodes: {:?}",
            pair
        );
    }
    for inline in inlines {
        match inline {
            Inline::Bold(s) | Inline::Italic(s) => count_inlines(&s.content, counts),
            Inline::Link(_) | Inline::RefLink(_) | Inline::ArticleLink(_) | Inline::TogglerLink(_) => {
                counts.links += 1
            }
            Inline::KatexBlock(_) | Inline::KatexInline(_) => counts.math += 1,
            Inline::Text(_) => {}
        }
    }
}

fn count_list(list: &UnorderedList, counts: &mut Counts) {
    counts.lists += 1;
    counts.list_items += list.items.len() as u32;
    for item in &list.items {
        count_inlines(&item.content, counts);
        if let Some(nested) = &item.nested {
            count_list(nested, counts);
        }
    }
}

fn count_blocks(blocks: &[Block], counts: &mut Counts) {
    for block in blocks {
        match block {
            Block::Heading(_) => counts.headings += 1,
            Block::Section(s) => {
                counts.sections += 1;
                count_blocks(&s.content, counts);
            }
            Block::Paragraph(p) => {
                counts.paragraphs += 1;
                count_inlines(&p.content, counts);
            }
            Block::List(l) => count_list(l, counts),
            Block::Table(t) => {
                counts.tables += 1;
                for cell in t.head.iter().chain(t.body.iter().flatten()) {
                    count_inlines(cell, counts);
                }
            }
        }
    }
}

fn count(input: &str) -> Counts {
    let parser = Parser::new();
    let result = parser.parse_with_diagnostics(input);
    assert_eq!(result.blocks, parser.parse(input));

    let mut counts = Counts::default();
    count_blocks(&result.blocks, &mut counts);
    counts
}

fn report(name: &str, counts: Counts, expected: Counts) {
    println!(
        "{}\t{}/{}\th={} s={} p={} l={} li={} t={} links={} math={}",
        name,
        counts.total(),
        expected.total(),
        counts.headings,
        counts.sections,
        counts.paragraphs,
        counts.lists,
        counts.list_items,
        counts.tables,
        counts.links,
        counts.math
    );
}

const BASE: &str = r#"# Enlightenment Now

Progress is measured, see [[the book|reference:pinker-enlightenment-now]].
Growth follows $e^{rt}$ and __compounds *quietly*__.

^ Data
    |Year|Value|
    |1900|$$x_0$$|
    |2000|[[chart|https://example.org]]|

_ Notes
    * First point
    ** Detail with [[Article]]
    * Second point [[open|toggle:Notes]]

Closing paragraph.
"#;

#[test]
fn robustness_report() {
    let expected = Counts {
        headings: 1,
        sections: 2,
        paragraphs: 2,
        lists: 2,
        list_items: 3,
        tables: 1,
        links: 4,
        math: 2,
    };
    let base = count(BASE);
    report("base", base, expected);
    assert_eq!(base, expected);

    for (i, variant) in generate_variants(BASE, SEED, MUTATIONS).iter().enumerate() {
        let counts = count(variant);
        report(&format!("variant-{}", i), counts, expected);
    }
}

#[test]
fn degenerate_inputs_are_total() {
    let inputs = [
        "*".repeat(5000),
        "_".repeat(5000),
        "$".repeat(5000),
        "[[".repeat(2000),
        "\\".repeat(3001),
        "|".repeat(1000),
        "^ x\n".repeat(500),
        (1..200).map(|n| "*".repeat(n)).collect::<Vec<_>>().join("\n"),
    ];
    for input in &inputs {
        let _ = count(input);
    }
}
