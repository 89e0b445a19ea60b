//! Clustering benchmark: exhaustive vs latitude-window scan.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use marker_cluster_rust::{cluster_with, ClusterConfig, GeoRecord, ScanStrategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn listings(n: usize) -> Vec<GeoRecord> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|i| {
            GeoRecord::new(
                i.to_string(),
                12.97 + rng.gen_range(-0.15..0.15),
                77.59 + rng.gen_range(-0.15..0.15),
                "listing",
            )
        })
        .collect()
}

fn cluster_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_zoom_11");

    for n in [100usize, 500, 2000] {
        let records = listings(n);

        for strategy in [ScanStrategy::Exhaustive, ScanStrategy::LatitudeWindow] {
            let config = ClusterConfig { strategy, ..ClusterConfig::default() };
            group.bench_with_input(BenchmarkId::new(format!("{:?}", strategy), n), &records, |b, records| {
                b.iter(|| cluster_with(black_box(records), black_box(11.0), &config).len())
            });
        }
    }

    group.finish();
}

criterion_group!(benches, cluster_benchmarks);
criterion_main!(benches);
