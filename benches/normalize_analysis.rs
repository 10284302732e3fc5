//! Benchmarks for analysis normalization
//!
//! This benchmark measures:
//! - Full normalization of a typical generated payload
//! - Infrastructure cleanup with placeholders, duplicates and backfill
//! - Key normalization and seed derivation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use market_potential::analysis::{normalize_analysis, normalize_infrastructure};
use market_potential::cache::{Purpose, RequestKey};
use serde_json::{json, Value};

fn sample_payload(items: usize) -> Value {
    let categories = ["metro", "hospital", "school", "mall", "park", "office"];
    let infrastructure: Vec<Value> = (0..items)
        .map(|i| {
            json!({
                "name": format!("Landmark {}", i % (items / 2 + 1)),
                "category": categories[i % categories.len()],
                "distance": format!("{:.1} km", (items - i) as f64 * 0.4),
            })
        })
        .collect();
    json!({
        "breakdown": {
            "connectivity": 88.37,
            "healthcare": "72",
            "education": 104,
            "retail": -3,
            "employment": 65.55
        },
        "infrastructure": infrastructure,
        "summary": "Well connected residential micro-market with steady demand."
    })
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_analysis");
    for items in [2usize, 8, 32] {
        let payload = sample_payload(items);
        group.throughput(Throughput::Elements(items as u64));
        group.bench_with_input(BenchmarkId::new("full", items), &payload, |b, p| {
            b.iter(|| normalize_analysis(black_box("Pune"), black_box("Baner"), black_box(p)))
        });
        group.bench_with_input(
            BenchmarkId::new("infrastructure", items),
            &payload,
            |b, p| {
                b.iter(|| {
                    normalize_infrastructure(black_box(p.get("infrastructure")), "Pune", "Baner")
                })
            },
        );
    }
    group.finish();
}

fn bench_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_key");
    group.bench_function("normalize_and_hash", |b| {
        b.iter(|| RequestKey::new(black_box("  Pune "), black_box("BANER")).request_id())
    });
    let key = RequestKey::new("Pune", "Baner");
    group.bench_function("seed", |b| b.iter(|| black_box(&key).seed(Purpose::Analysis)));
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_key);
criterion_main!(benches);
