//! Benchmarks for CSV parsing and alignment.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quantfolio_core::types::{SymbolUniverse, COMBINED_WINDOW};
use quantfolio_data::{align, FallbackGenerator, RecordParser};
use std::collections::HashMap;

fn generate_csv(rows: usize) -> String {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let mut csv = String::from(",open,high,low,close,volume\n");
    for i in 0..rows {
        let date = start + Duration::days(i as i64);
        let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
        csv.push_str(&format!(
            "{},{:.2},{:.2},{:.2},{:.2},{}\n",
            date.format("%Y-%m-%d"),
            close - 1.0,
            close + 2.0,
            close - 2.0,
            close,
            1_000_000 + i
        ));
    }
    csv
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [100, 1000, 10000].iter() {
        let csv = generate_csv(*size);

        group.bench_with_input(BenchmarkId::new("capped", size), &csv, |b, csv| {
            let parser = RecordParser::new();
            b.iter(|| parser.parse(black_box(csv), "AAPL"))
        });

        group.bench_with_input(BenchmarkId::new("uncapped", size), &csv, |b, csv| {
            let parser = RecordParser::new().with_max_rows(usize::MAX);
            b.iter(|| parser.parse(black_box(csv), "AAPL"))
        });
    }

    group.finish();
}

fn benchmark_align(c: &mut Criterion) {
    let universe = SymbolUniverse::default();
    let parser = RecordParser::new();
    let csv = generate_csv(100);

    let series: HashMap<_, _> = universe
        .iter()
        .map(|s| (s.to_string(), parser.parse(&csv, s).unwrap()))
        .collect();

    c.bench_function("align_mag7", |b| {
        b.iter(|| align(black_box(&series), &universe, COMBINED_WINDOW))
    });

    let generator = FallbackGenerator::new(universe.clone());
    c.bench_function("fallback_mag7", |b| b.iter(|| generator.generate_seeded(black_box(42))));
}

criterion_group!(benches, benchmark_parse, benchmark_align);
criterion_main!(benches);
