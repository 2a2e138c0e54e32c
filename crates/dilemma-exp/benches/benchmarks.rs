//! Partition enumeration benchmarks
//!
//! The enumeration is the only combinatorially exploding stage of the
//! pipeline; everything else is linear in the number of partitions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use dilemma_exp::{AnchorPolicy, Partitions};

fn letters(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| char::from(b'A' + i as u8).to_string())
        .collect()
}

fn bench_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("partitions");

    for (n, k) in [(8, 2), (10, 2), (12, 4)] {
        group.bench_with_input(
            BenchmarkId::new("enumerate", format!("n{n}_k{k}")),
            &(n, k),
            |b, &(n, k)| {
                b.iter(|| {
                    let count = Partitions::new(letters(n), k, AnchorPolicy::First)
                        .unwrap()
                        .count();
                    black_box(count)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_enumeration);
criterion_main!(benches);
