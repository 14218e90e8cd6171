use criterion::{Criterion, criterion_group, criterion_main};
use rteditor_engine::export::{self, MarkdownOptions};
use rteditor_engine::stats::DocumentStats;
mod common;

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    group.sample_size(10);

    let doc = common::generate_large_document();
    let options = MarkdownOptions::default();

    group.bench_function("markdown", |b| {
        b.iter(|| {
            let markdown = export::serialize(std::hint::black_box(&doc), &options);
            std::hint::black_box(markdown);
        });
    });

    group.bench_function("html", |b| {
        b.iter(|| {
            let html = export::to_html(std::hint::black_box(&doc));
            std::hint::black_box(html);
        });
    });

    let json = export::to_json(&doc).unwrap();
    group.bench_function("json_load", |b| {
        b.iter(|| {
            let loaded = export::from_json(std::hint::black_box(&json)).unwrap();
            std::hint::black_box(loaded);
        });
    });

    group.bench_function("stats", |b| {
        b.iter(|| {
            let stats = DocumentStats::from_doc(std::hint::black_box(&doc), 200);
            std::hint::black_box(stats);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_export);
criterion_main!(benches);
