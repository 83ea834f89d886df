use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tagmark_parser::{
    NodeRef, Options, Registry, Tag, TagDefinition, TagFlags, parse,
    tagmark_core::{Html, RenderOptions},
};

#[derive(Debug)]
struct Plain(TagDefinition);

impl Tag for Plain {
    fn definition(&self) -> &TagDefinition {
        &self.0
    }

    fn render_html(&self, _node: NodeRef<'_>, inner: Html, _options: &RenderOptions) -> Html {
        inner
    }

    fn render_text(&self, _node: NodeRef<'_>, inner: String, _options: &RenderOptions) -> String {
        inner
    }
}

fn registry() -> Registry {
    Registry::with_tags(
        [
            TagDefinition::new("b", TagFlags::inline()),
            TagDefinition::new("url", TagFlags::inline()),
            TagDefinition::new(
                "quote",
                TagFlags::block()
                    .swallow_trailing_newline()
                    .make_paragraphs_here(),
            ),
            TagDefinition::new("list", TagFlags::block()),
            TagDefinition::new("*", TagFlags::block().same_tag_closes()),
            TagDefinition::new("code", TagFlags::block().verbatim()),
        ]
        .into_iter()
        .map(|definition| Arc::new(Plain(definition)) as Arc<dyn Tag>),
    )
    .expect("benchmark tags are valid")
}

fn documents() -> Vec<(&'static str, String)> {
    let post = "[quote=someone]Have a look at [url=https://example.com]this[/url].\n\n\
                [b]Really[/b].[/quote]\n[list]\n[*]one\n[*]two [b]bold\n[/list]\n\
                [code]fn main() { println!(\"[b]\"); }[/code]\n";
    vec![
        ("forum_post", post.to_string()),
        ("long_thread", post.repeat(200)),
        ("deep_nesting", format!("{}x", "[b]".repeat(60))),
        ("plain_text", "Lorem ipsum dolor sit amet.\n".repeat(500)),
    ]
}

fn parse_benchmark(c: &mut Criterion) {
    let registry = registry();
    let options = Options::builder().with_paragraphs().build();
    let mut group = c.benchmark_group("parser");

    for (name, content) in documents() {
        group.bench_with_input(BenchmarkId::new("parse", name), &content, |b, input| {
            b.iter(|| black_box(parse(black_box(input), &registry, &options)));
        });
        group.bench_with_input(BenchmarkId::new("sanitize", name), &content, |b, input| {
            b.iter(|| {
                if let Ok(mut document) = parse(black_box(input), &registry, &options) {
                    black_box(document.sanitize());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, parse_benchmark);
criterion_main!(benches);
