//! Indexing and query throughput for the in-memory store.
//!
//! Simulates catalogs of short titles:
//! - Small:  ~1k titles  (a personal collection)
//! - Medium: ~10k titles (a shop or museum catalog)
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ngramdex::index;
use ngramdex::testing::{artwork_engine, seeded_engine, titles_index, Artwork};
use ngramdex::{IndexConfig, MemoryStore, SearchOptions};
use serde_json::json;

// ============================================================================
// CATALOG SIMULATION
// ============================================================================

struct CatalogSize {
    name: &'static str,
    titles: usize,
}

const CATALOG_SIZES: &[CatalogSize] = &[
    CatalogSize {
        name: "small",
        titles: 1_000,
    },
    CatalogSize {
        name: "medium",
        titles: 10_000,
    },
];

const WORDS: &[&str] = &[
    "flowers", "garden", "portrait", "river", "night", "harbor", "study", "still", "life",
    "mountain", "woman", "reading", "window", "cafe", "boats", "winter", "morning", "bridge",
    "olive", "trees", "wheat", "field", "cypresses", "self", "starry", "almond", "blossom",
    "sunflowers", "irises", "bedroom", "poppies", "harvest", "lilies", "cathedral", "sea",
];

const COLORS: &[&str] = &["red", "green", "blue", "yellow", "black", "white"];

fn generate_title(seed: usize) -> String {
    let words = 1 + seed % 4;
    (0..words)
        .map(|i| WORDS[(seed * 7 + i * 13) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate_catalog(size: &CatalogSize) -> Vec<Artwork> {
    (0..size.titles)
        .map(|i| {
            let colors = [COLORS[i % COLORS.len()], COLORS[(i / 3) % COLORS.len()]];
            Artwork::new(i as u64 + 1, &generate_title(i)).with_colors(&colors)
        })
        .collect()
}

// ============================================================================
// BENCHMARKS
// ============================================================================

fn bench_reindex(c: &mut Criterion) {
    let mut group = c.benchmark_group("reindex_batch");

    for size in CATALOG_SIZES {
        let catalog = generate_catalog(size);
        let definition = titles_index(IndexConfig::default());

        group.throughput(Throughput::Elements(catalog.len() as u64));
        group.bench_with_input(BenchmarkId::new("memory", size.name), &catalog, |b, catalog| {
            b.iter(|| {
                let store = MemoryStore::new();
                index::reindex_batch(&store, &definition, black_box(catalog.as_slice()), None)
            });
        });
    }

    group.finish();
}

fn bench_reindex_one(c: &mut Criterion) {
    let catalog = generate_catalog(&CATALOG_SIZES[1]);
    let engine = seeded_engine(&catalog);
    let changed = Artwork::new(42, "Sunflowers in a Vase").with_colors(&["yellow"]);

    c.bench_function("reindex_document/medium", |b| {
        b.iter(|| engine.reindex_document(black_box(&changed)));
    });
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_query");

    let queries = [
        ("single_word", "flowers"),
        ("two_words", "starry night"),
        ("typo", "sunflowrs"),
        ("short", "sea"),
        ("no_match", "xyznonexistent"),
    ];

    for size in CATALOG_SIZES {
        let engine = seeded_engine(&generate_catalog(size));
        for (name, query) in queries {
            group.bench_with_input(
                BenchmarkId::new(name, size.name),
                &query,
                |b, query| {
                    b.iter(|| engine.search(black_box(query), &SearchOptions::default()));
                },
            );
        }
    }

    group.finish();
}

fn bench_search_filtered(c: &mut Criterion) {
    let engine = seeded_engine(&generate_catalog(&CATALOG_SIZES[1]));
    let options = SearchOptions::default().filter("colors", json!({"any": ["red", "yellow"]}));

    c.bench_function("search_filtered/medium", |b| {
        b.iter(|| engine.search(black_box("garden flowers"), &options));
    });
}

fn bench_result_count_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_results");
    let engine = seeded_engine(&generate_catalog(&CATALOG_SIZES[1]));

    for limit in [1usize, 10, 100, 1000] {
        let options = SearchOptions::default().max_results(Some(limit));
        group.bench_with_input(BenchmarkId::from_parameter(limit), &options, |b, options| {
            b.iter(|| engine.search(black_box("river boats"), options));
        });
    }

    group.finish();
}

fn bench_tokenize(c: &mut Criterion) {
    let engine = artwork_engine(IndexConfig::default());
    let title = "Still Life with Sunflowers and Almond Blossom";

    let mut group = c.benchmark_group("tokenize");
    group.bench_function("indexed", |b| b.iter(|| engine.tokenize(Some("titles"), black_box(title), false)));
    group.bench_function("probe", |b| b.iter(|| engine.tokenize(Some("titles"), black_box(title), true)));
    group.finish();
}

criterion_group!(
    benches,
    bench_reindex,
    bench_reindex_one,
    bench_search,
    bench_search_filtered,
    bench_result_count_scaling,
    bench_tokenize,
);

criterion_main!(benches);
