//! Normalizer throughput on lenient and strict inputs of growing size.

use confjson_core::{normalize, Registry, DEFAULT_DOCUMENT};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

/// A lenient document with `n` detector-layer blocks.
fn lenient_document(n: usize) -> String {
    let mut text = String::from("// generated\n{\n  Run: { Seed: 12345, G4DATA: /opt/geant4/data }\n  Layers: [\n");
    for i in 0..n {
        text.push_str(&format!(
            "    {{ name: layer_{i}, thickness: .{i}, offset: +{i} /* cm */, start: 12:00:{:02} }}\n",
            i % 60
        ));
    }
    text.push_str("  ]\n}\n");
    text
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for n in [10, 100, 1000] {
        let lenient = lenient_document(n);
        let strict = normalize(&lenient).expect("generated document normalizes");

        group.bench_with_input(BenchmarkId::new("lenient", n), &lenient, |b, text| {
            b.iter(|| normalize(black_box(text)))
        });
        group.bench_with_input(BenchmarkId::new("strict", n), &strict, |b, text| {
            b.iter(|| normalize(black_box(text)))
        });
    }

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let text = lenient_document(100);
    c.bench_function("load_text_100_layers", |b| {
        b.iter(|| {
            let mut registry = Registry::new();
            registry
                .load_text(DEFAULT_DOCUMENT, black_box(&text), false)
                .expect("generated document loads");
            registry
        })
    });
}

criterion_group!(benches, bench_normalize, bench_load);
criterion_main!(benches);
