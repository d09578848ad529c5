//! Benchmarks comparing wikimark parsing vs pulldown-cmark (Markdown)
//!
//! Run with: cargo bench -p wikimark-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pulldown_cmark::{Options, Parser as MdParser};
use wikimark_core::inline::InlineParser;
use wikimark_core::Parser;

const WIKIMARK_SAMPLE: &str = r#"# Introduction

This is a paragraph with *emphasis*, __strong text__, and $e^{i\pi} + 1 = 0$.
It links to [[the reference|reference:benchmark-doc]] and [[Related Article]].

^ Lists
    * First item with some content
    * Second item with more content
    ** Nested detail under the second item
    * Third item concluding the list

_ Table
    |Name|Speed|Memory|
    |Fast|100ms|10MB|
    |Medium|500ms|50MB|
    |Slow|[[1000ms|https://example.com/slow]]|100MB|

^ Math
    $$\sum_{k=1}^{n} k = \frac{n(n+1)}{2}$$
    Expand the [[table|toggle:Table]] for numbers.

End of document.
"#;

/// Equivalent Markdown content (as close as possible)
const MARKDOWN_SAMPLE: &str = r#"# Introduction

This is a paragraph with *emphasis*, **strong text**, and $e^{i\pi} + 1 = 0$.
It links to [the reference](reference:benchmark-doc) and [Related Article](Related_Article).

## Lists

- First item with some content
- Second item with more content
  - Nested detail under the second item
- Third item concluding the list

## Table

| Name   | Speed  | Memory |
| ------ | ------ | ------ |
| Fast   | 100ms  | 10MB   |
| Medium | 500ms  | 50MB   |
| Slow   | [1000ms](https://example.com/slow) | 100MB |

## Math

$$\sum_{k=1}^{n} k = \frac{n(n+1)}{2}$$
Expand the [table](#table) for numbers.

End of document.
"#;

fn bench_wikimark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let parser = Parser::new();

    group.throughput(Throughput::Bytes(WIKIMARK_SAMPLE.len() as u64));

    group.bench_function("wikimark", |b| {
        b.iter(|| {
            let blocks = parser.parse(black_box(WIKIMARK_SAMPLE));
            black_box(blocks.len())
        })
    });

    group.throughput(Throughput::Bytes(MARKDOWN_SAMPLE.len() as u64));

    group.bench_function("markdown_pulldown", |b| {
        b.iter(|| {
            let parser = MdParser::new_ext(black_box(MARKDOWN_SAMPLE), Options::all());
            let events: Vec<_> = parser.collect();
            black_box(events.len())
        })
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");
    let parser = Parser::new();

    for size in [1, 5, 10, 20].iter() {
        let wikimark_content: String = WIKIMARK_SAMPLE.repeat(*size);
        let markdown_content: String = MARKDOWN_SAMPLE.repeat(*size);

        group.throughput(Throughput::Bytes(wikimark_content.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("wikimark", size),
            &wikimark_content,
            |b, content| {
                b.iter(|| {
                    let blocks = parser.parse(black_box(content));
                    black_box(blocks.len())
                })
            },
        );

        group.throughput(Throughput::Bytes(markdown_content.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("markdown", size),
            &markdown_content,
            |b, content| {
                b.iter(|| {
                    let parser = MdParser::new_ext(black_box(content), Options::all());
                    let events: Vec<_> = parser.collect();
                    black_box(events.len())
                })
            },
        );
    }

    group.finish();
}

fn bench_inline_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline");

    let wikimark_inline =
        "This has *emphasis*, __strong__, $x^2$, [[link|https://example.com]], and [[Article]].";
    let markdown_inline =
        "This has *emphasis*, **strong**, $x^2$, [link](https://example.com), and [Article](Article).";
    let inline = InlineParser::default();

    group.bench_function("wikimark_inline", |b| {
        b.iter(|| {
            let inlines = inline.parse_line(black_box(wikimark_inline));
            black_box(inlines.map_or(0, |i| i.len()))
        })
    });

    group.bench_function("markdown_inline", |b| {
        b.iter(|| {
            let parser = MdParser::new_ext(black_box(markdown_inline), Options::all());
            let events: Vec<_> = parser.collect();
            black_box(events.len())
        })
    });

    group.finish();
}

fn bench_degenerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("degenerate");
    let parser = Parser::new();

    let unclosed = "*_[[$".repeat(400);
    group.throughput(Throughput::Bytes(unclosed.len() as u64));
    group.bench_function("unclosed_markers", |b| {
        b.iter(|| {
            let result = parser.parse_with_diagnostics(black_box(&unclosed));
            black_box(result.diagnostics.len())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_wikimark_parse,
    bench_scaling,
    bench_inline_parsing,
    bench_degenerate
);
criterion_main!(benches);
