//! Criterion benchmarks for Searchlight.
//!
//! Covers text analysis, query assembly and in-memory search.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use searchlight::analysis::Analyzer;
use searchlight::prelude::*;
use searchlight::query::SearchRequest;
use serde_json::json;
use std::hint::black_box;

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> DocumentBatch {
    let words = [
        "search", "engine", "rust", "testing", "index", "document", "query", "fuzzy", "driver",
        "result", "book", "movie", "garden", "cooking", "travel", "history",
    ];
    let categories = ["book", "movie", "music"];

    let mut documents = DocumentBatch::new();
    for i in 0..count {
        let title: Vec<&str> = (0..6)
            .map(|j| words[(i * 7 + j * 13) % words.len()]) // Pseudo-random distribution
            .collect();
        documents.insert(
            DocumentId::from(i as i64),
            attributes(json!({
                "title": title.join(" "),
                "category": categories[i % categories.len()],
                "price": (i % 100) as i64,
            })),
        );
    }

    documents
}

/// Benchmark text analysis.
fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");

    let analyzer = Analyzer::standard();
    let text = "Testing the searching engines of running documents and indexes";

    group.bench_function("analyze_sentence", |b| {
        b.iter(|| black_box(analyzer.analyze(black_box(text))))
    });

    group.finish();
}

/// Benchmark query assembly and request rendering.
fn bench_query_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_assembly");

    group.bench_function("build_and_render", |b| {
        b.iter(|| {
            let mut builder = QueryBuilder::standard();
            let options = MatchOptions {
                fuzzy: true,
                ..Default::default()
            };
            builder.match_query("title", "rust testing", options).must();
            builder.term("category", "book");
            if let Ok(clause) =
                builder.range("price", Bounds::new().gte(10).lt(50), RangeOptions::default())
            {
                clause.must();
            }
            builder.prefix("title", "sea").must_not();

            let request = SearchRequest::from_clauses(&["products"], builder.clauses());
            black_box(request.with_window(0, 20).to_json())
        })
    });

    group.finish();
}

/// Benchmark searches against the in-memory driver.
fn bench_memory_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_search");
    group.sample_size(20);

    let driver = MemoryDriver::new();
    driver
        .add_multiple("products", generate_test_documents(1000))
        .expect("indexing benchmark documents");

    group.throughput(Throughput::Elements(1000));
    group.bench_function("must_should", |b| {
        let mut builder = driver.query_builder();
        builder
            .match_query("title", "testing", MatchOptions { fuzzy: true, ..Default::default() })
            .must();
        builder.term("category", "book");
        let clauses = builder.into_clauses();

        b.iter(|| black_box(driver.get(&["products"], black_box(&clauses))))
    });

    group.bench_function("paginate_match_all", |b| {
        b.iter(|| black_box(driver.paginate(&["products"], &[], black_box(3), 25, None)))
    });

    group.bench_function("query_string", |b| {
        let mut builder = driver.query_builder();
        builder.query_string("+category:movie title:garden -title:travel");
        let clauses = builder.into_clauses();

        b.iter(|| black_box(driver.get(&[], black_box(&clauses))))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_text_analysis,
    bench_query_assembly,
    bench_memory_search
);
criterion_main!(benches);
