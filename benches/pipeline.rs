//! Benchmarks for the processed-rows pipeline.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridstate::{
    AdvancedFilter, Column, FilterOperator, GridEngine, GridOptions, SmartFilterEngine,
    SortDirection, VirtualWindow,
};
use serde_json::json;

const CITIES: [&str; 5] = ["London", "New York", "Austin", "Lisbon", "Tokyo"];

/// Deterministic synthetic records, no RNG needed.
fn records(n: usize) -> Vec<serde_json::Value> {
    (0..n)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("person-{:05}", (i * 7919) % n.max(1)),
                "age": (i * 37) % 90,
                "city": CITIES[i % CITIES.len()],
            })
        })
        .collect()
}

fn columns() -> Vec<Column<serde_json::Value>> {
    vec![
        Column::new("id"),
        Column::new("name"),
        Column::new("age"),
        Column::new("city"),
    ]
}

fn engine(n: usize) -> GridEngine<serde_json::Value> {
    let mut engine = GridEngine::new();
    engine.initialize(
        records(n),
        columns(),
        GridOptions {
            multi_sort: true,
            page_size: 50,
            ..GridOptions::default()
        },
    );
    engine
}

/// Full pipeline recomputation: filter + two-key sort + paginate.
fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    for n in [1_000usize, 10_000, 50_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("recompute", n), &n, |b, &n| {
            let mut e = engine(n);
            e.set_filter("age", 30.0, FilterOperator::GreaterThan);
            e.sort_by("city", Some(SortDirection::Ascending));
            e.sort_by("age", Some(SortDirection::Descending));
            b.iter(|| {
                e.refresh();
                black_box(e.processed_rows().len())
            })
        });
    }
    group.finish();
}

/// Filter stage alone, via a changing filter value.
fn bench_filtering(c: &mut Criterion) {
    let mut e = engine(10_000);
    c.bench_function("set_filter_10k", |b| {
        b.iter(|| {
            e.set_filter("name", black_box("person-001"), FilterOperator::Contains);
            black_box(e.pagination().total_items)
        })
    });
}

/// Smart filter evaluation with AND/OR composition and a regex.
fn bench_smart_filters(c: &mut Criterion) {
    let e = engine(10_000);
    let mut smart = SmartFilterEngine::new();
    smart.set_filter(AdvancedFilter::new("age", FilterOperator::Between, 20.0).value2(60.0));
    smart.set_filter(AdvancedFilter::new("city", FilterOperator::Equals, "London").or());
    smart.set_filter(AdvancedFilter::new("city", FilterOperator::Equals, "Tokyo").or());
    smart.set_filter(AdvancedFilter::new("name", FilterOperator::Regex, r"person-0\d{2}1"));
    let cols = columns();

    c.bench_function("smart_apply_10k", |b| {
        b.iter(|| black_box(smart.apply(e.all_rows(), &cols).len()))
    });
}

/// Window math is constant-time; measure it to keep it honest.
fn bench_virtual_window(c: &mut Criterion) {
    let mut w = VirtualWindow::new(800.0, 32.0, 5);
    w.set_total_items(1_000_000);
    let mut scroll = 0.0_f32;
    c.bench_function("virtual_window_scroll", |b| {
        b.iter(|| {
            scroll = (scroll + 97.0) % 31_999_000.0;
            w.set_scroll_top(black_box(scroll));
            black_box(w.visible_range())
        })
    });
}

criterion_group!(
    benches,
    bench_full_pipeline,
    bench_filtering,
    bench_smart_filters,
    bench_virtual_window,
);

criterion_main!(benches);
