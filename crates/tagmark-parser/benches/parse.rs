//! Benchmarks for parsing and HTML rendering.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tagmark_ast::{
    HtmlWriter, ModuleError, ModuleParams, ModuleRegistry, PageHelper, RenderContext,
    RenderSettings, render_html,
};
use tagmark_parser::{ForumCapabilities, parse_forum, parse_wiki};

struct BenchHelper;

impl PageHelper for BenchHelper {
    fn absolute_url(&self, href: &str) -> String {
        if href.starts_with('/') {
            format!("https://tagmark.test{href}")
        } else {
            href.to_owned()
        }
    }

    fn check_condition(&self, _condition: &str) -> bool {
        false
    }

    fn run_module(
        &self,
        _writer: &mut HtmlWriter,
        name: &str,
        _parameters: &ModuleParams,
    ) -> Result<(), ModuleError> {
        Err(ModuleError::Unknown(name.to_owned()))
    }
}

struct NoModules;

impl ModuleRegistry for NoModules {
    fn is_module(&self, _name: &str) -> bool {
        false
    }
}

/// Generate a forum post with the given number of paragraphs.
fn generate_post(paragraphs: usize) -> String {
    let mut post = String::with_capacity(paragraphs * 120);
    for i in 0..paragraphs {
        post.push_str(&format!(
            "Paragraph {i} with [b]bold[/b], [i]italic[/i] and a \
             [url=https://example.com/{i}]link[/url].\n"
        ));
    }
    post
}

fn bench_parse_plain_text(c: &mut Criterion) {
    let input = "just some text with no tags at all, repeated. ".repeat(50);
    c.bench_function("parse_plain_text", |b| {
        b.iter(|| parse_forum(&input, ForumCapabilities::bbcode()));
    });
}

fn bench_parse_forum_post(c: &mut Criterion) {
    let input = generate_post(20);
    c.bench_function("parse_forum_post_20p", |b| {
        b.iter(|| parse_forum(&input, ForumCapabilities::bbcode()));
    });
}

fn bench_parse_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_by_size");
    for paragraphs in [5, 50, 500] {
        let input = generate_post(paragraphs);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("forum", format!("{paragraphs}p")),
            &input,
            |b, input| b.iter(|| parse_forum(input, ForumCapabilities::bbcode())),
        );
    }
    group.finish();
}

fn bench_parse_bracket_heavy(c: &mut Criterion) {
    // Every bracket fails tag recognition and falls through to text.
    let input = "[not [a] tag] [also not] [[ ]] ".repeat(100);
    c.bench_function("parse_bracket_heavy_literal", |b| {
        b.iter(|| parse_forum(&input, ForumCapabilities::bbcode()));
    });
}

fn bench_parse_wiki_page(c: &mut Criterion) {
    let mut page = String::new();
    page.push_str("%%TOC%%\n");
    for i in 0..10 {
        page.push_str(&format!("[h2]Section {i}[/h2]\n"));
        page.push_str(&format!(
            "[div=paragraph]Body {i} with [wiki=Page{i}]a page link[/wiki].[/div]\n"
        ));
    }
    c.bench_function("parse_wiki_page_10_sections", |b| {
        b.iter(|| parse_wiki(&page, &NoModules));
    });
}

fn bench_parse_and_render(c: &mut Criterion) {
    let input = generate_post(20);
    let helper = BenchHelper;
    c.bench_function("parse_and_render_html_20p", |b| {
        b.iter(|| {
            let tree = parse_forum(&input, ForumCapabilities::bbcode());
            let ctx = RenderContext::new(&helper, RenderSettings::default(), &tree);
            render_html(&tree, &ctx).expect("well-formed tree renders")
        });
    });
}

criterion_group!(
    benches,
    bench_parse_plain_text,
    bench_parse_forum_post,
    bench_parse_varying_sizes,
    bench_parse_bracket_heavy,
    bench_parse_wiki_page,
    bench_parse_and_render,
);

criterion_main!(benches);
