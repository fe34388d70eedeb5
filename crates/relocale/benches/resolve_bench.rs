//! Benchmarks for lookup and culture switching.
//!
//! Run with: cargo bench -p relocale --bench resolve_bench

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use relocale::{CultureConfig, CultureContext, LocalizedValue, TranslationEntry};

fn populated_context(keys: usize) -> Arc<CultureContext> {
    let ctx = CultureContext::new(CultureConfig::new("en")).expect("valid config");
    let entries = (0..keys).map(|i| {
        TranslationEntry::new(format!("Ns{}", i % 16), format!("Key{i}"))
            .with_text("en", format!("Text {i} {{0}}"))
            .with_text("fr", format!("Texte {i} {{0}}"))
    });
    ctx.store().register_all(entries).expect("valid entries");
    ctx
}

// =============================================================================
// Store lookup
// =============================================================================

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("relocale/resolve");
    let ctx = populated_context(4096);
    let store = ctx.store();

    group.bench_function("exact", |b| {
        b.iter(|| black_box(store.resolve(black_box("Key1234"), black_box("Ns2"), "fr")))
    });
    group.bench_function("fallback", |b| {
        b.iter(|| black_box(store.resolve(black_box("Key1234"), black_box("Ns2"), "de")))
    });
    group.bench_function("missing_key", |b| {
        b.iter(|| black_box(store.resolve(black_box("Nope"), black_box("Ns2"), "fr")))
    });
    group.bench_function("translate_args", |b| {
        b.iter(|| black_box(ctx.translate_args("Key1234", "Ns2", &["x"])))
    });

    group.finish();
}

// =============================================================================
// Culture switch fan-out
// =============================================================================

fn bench_switch(c: &mut Criterion) {
    let mut group = c.benchmark_group("relocale/set_culture");

    for count in [10usize, 100, 1000] {
        let ctx = populated_context(count);
        let values: Vec<LocalizedValue> = (0..count)
            .map(|i| {
                ctx.value(&format!("Ns{}", i % 16), &format!("Key{i}"))
                    .format([LocalizedValue::constant("arg")])
            })
            .collect();
        for value in &values {
            let _ = value.text();
        }

        group.bench_with_input(BenchmarkId::new("values", count), &count, |b, _| {
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let culture = if flip { "fr" } else { "en" };
                black_box(ctx.set_culture(culture).expect("valid culture"))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_switch);
criterion_main!(benches);
