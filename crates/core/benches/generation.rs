use chrono::{TimeDelta, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use spawngrid::compute::bucket::expand;
use spawngrid::{
    BucketCache, BucketGrid, Config, CoordinateGenerator, GeoPoint, LongitudeCorrection, MemoryStore,
};
use std::sync::Arc;

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");
    let grid = BucketGrid::default();

    group.bench_function("index", |b| {
        b.iter(|| grid.index(black_box(37.7749), black_box(-122.4194)))
    });

    group.bench_function("index_and_expand", |b| {
        b.iter(|| expand(grid.index(black_box(-33.8688), black_box(151.2093))))
    });

    group.finish();
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    let center = GeoPoint::new(37.7749, -122.4194);

    for count in [5usize, 50, 500].iter() {
        group.throughput(Throughput::Elements(*count as u64));

        for correction in [LongitudeCorrection::Latitude, LongitudeCorrection::Legacy] {
            let generator = CoordinateGenerator::new(0.00676, correction);
            let mut rng = StdRng::seed_from_u64(7);

            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", correction).to_lowercase(), count),
                count,
                |b, &n| b.iter(|| generator.generate(&mut rng, black_box(center), n)),
            );
        }
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let runtime = tokio::runtime::Runtime::new().unwrap();

    group.bench_function("cold", |b| {
        b.iter(|| {
            let cache = BucketCache::memory().unwrap();
            runtime.block_on(cache.lookup(black_box(52.52), 13.405)).unwrap()
        })
    });

    let cache = BucketCache::new(
        Arc::new(MemoryStore::new()),
        Config::default().with_seed(1),
    )
    .unwrap();
    let now = Utc::now();
    runtime.block_on(cache.lookup_at(48.8566, 2.3522, now)).unwrap();

    group.bench_function("warm", |b| {
        b.iter(|| {
            runtime
                .block_on(cache.lookup_at(black_box(48.8566), 2.3522, now + TimeDelta::minutes(1)))
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_grid, bench_generation, bench_lookup);
criterion_main!(benches);
