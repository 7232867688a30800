//! Benchmarks for parsing patterns and building complete templates.

use std::hint::black_box;

use circlestitch::{parser::parse, template_from_str};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

/// Benchmark patterns: (label, pattern).
fn bench_patterns() -> Vec<(&'static str, &'static str)> {
    vec![
        ("simple", "L 10,1"),
        ("two-sequences", "H 16 L 7,1 S 2 ; L 4 C 2"),
        ("hexagon", "H 42 OC 1.1 K 0.8 N 6 M 3 IC 0.7 L 16,3"),
        (
            "cross-hatch",
            "L 8,1, 22,31, 12,1, 18,31, 16,1, 14,31, 20,1, 10,31 C 33",
        ),
        // Long walk: many holes and a skip list coprime with them.
        ("dense", "H 997 L 13,7,5,3,2"),
    ]
}

/// Benchmark parsing alone.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, pattern) in bench_patterns() {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| parse(black_box(pattern)))
        });
    }
    group.finish();
}

/// Benchmark parse, geometry, stitch generation and accounting together.
fn bench_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("template");
    for (name, pattern) in bench_patterns() {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| template_from_str(black_box(pattern)))
        });
    }
    group.finish();
}

#[allow(missing_docs, clippy::missing_docs_in_private_items)]
mod bench_defs {
    use super::*;
    criterion_group!(benches, bench_parse, bench_template);
}

pub use bench_defs::benches;
criterion_main!(benches);
