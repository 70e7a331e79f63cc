//! Benchmarks for prosestrip filtering performance.
//!
//! Run with: cargo bench
//!
//! Documents mix prose, code, markup and number tables in random order.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use prosestrip::{FilterOptions, RegexMode};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const PROSE: &[&str] = &[
    "The committee reviewed the proposal and agreed to vote next week.",
    "Rivers carried the melting snow down into the valley every spring. Farmers waited for it.",
    "After a long debate the members postponed the final decision until the autumn session.",
    "She wrote the report in a single afternoon and sent it to the editors before dinner.",
];

const NOISE: &[&str] = &[
    "function init() { return window.app; }",
    "<div class=\"nav\"><a href=\"/home\">Home</a> | <a href=\"/about\">About</a></div>",
    "2024 01 15 0930 123456789 88.2 91.4",
    "var x = document.getElementById(\"main\");",
    "See https://example.com/docs and www.example.org/path for parseHTTPResponseHeaderValue.",
    "## ** ## -- ##",
];

/// Creates a synthetic document with the given number of paragraphs.
fn create_test_document(paragraph_count: usize) -> String {
    let mut rng = StdRng::seed_from_u64(42);
    let mut paragraphs = Vec::with_capacity(paragraph_count);

    for i in 0..paragraph_count {
        let pool = if i % 3 == 0 { NOISE } else { PROSE };
        if let Some(p) = pool.choose(&mut rng) {
            paragraphs.push(*p);
        }
    }

    paragraphs.join("\n\n")
}

/// Benchmark the full pipeline at various sizes.
fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let options = FilterOptions::default();

    for para_count in [10, 100, 1000].iter() {
        let text = create_test_document(*para_count);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("paragraphs", para_count), &text, |b, text| {
            b.iter(|| prosestrip::filter(black_box(text), &options));
        });
    }

    group.finish();
}

/// Benchmark with every optional stage enabled.
fn bench_filter_all_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_all_stages");
    let options = FilterOptions::aggressive()
        .with_html_mode(prosestrip::HtmlMode::DiscardSegments)
        .with_custom_regex(r"(?<=\s)\d+", RegexMode::RemoveMatches)
        .with_urls();

    for para_count in [10, 100, 1000].iter() {
        let text = create_test_document(*para_count);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("paragraphs", para_count), &text, |b, text| {
            b.iter(|| prosestrip::process_text(black_box(text), &options));
        });
    }

    group.finish();
}

/// Benchmark URL extraction.
fn bench_url_extraction(c: &mut Criterion) {
    let text = create_test_document(500);
    c.bench_function("extract_urls", |b| {
        b.iter(|| prosestrip::extract_urls(black_box(&text)));
    });
}

/// Benchmark parallel batch processing.
fn bench_process_many(c: &mut Criterion) {
    let docs: Vec<String> = (0..64).map(|_| create_test_document(100)).collect();
    let options = FilterOptions::default();
    c.bench_function("process_many_64", |b| {
        b.iter(|| prosestrip::process_many(black_box(&docs), &options));
    });
}

criterion_group!(
    benches,
    bench_filter,
    bench_filter_all_stages,
    bench_url_extraction,
    bench_process_many,
);
criterion_main!(benches);
