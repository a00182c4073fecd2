#![allow(missing_docs)]
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use haptic_benches::{plunging_segments, terrain};
use haptic_geom::{CollisionRecorder, CollisionSettings};
use std::time::Duration;

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_index_build");
    for &cells in &[8usize, 32, 64] {
        let triangles = 2 * cells * cells;
        group.throughput(Throughput::Elements(triangles as u64));
        group.bench_with_input(BenchmarkId::from_parameter(triangles), &cells, |b, &cells| {
            b.iter_batched(
                || terrain(cells, 0.01, 7),
                |mut mesh| {
                    mesh.create_collision_index(0.005).expect("build");
                    mesh
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_index_query");
    let segments = plunging_segments(256, 11);
    let settings = CollisionSettings {
        collision_radius: 0.005,
        ..CollisionSettings::default()
    };
    for &cells in &[8usize, 32, 64] {
        let mut mesh = terrain(cells, 0.01, 7);
        mesh.create_collision_index(0.005).expect("build");
        group.throughput(Throughput::Elements(segments.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(2 * cells * cells),
            &mesh,
            |b, mesh| {
                let mut recorder = CollisionRecorder::new();
                b.iter(|| {
                    let mut hits = 0usize;
                    for (a, end) in &segments {
                        recorder.clear();
                        if mesh.compute_collision(a, end, &mut recorder, &settings) {
                            hits += 1;
                        }
                    }
                    criterion::black_box(hits)
                });
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(5))
        .sample_size(50);
    targets = bench_build, bench_query
}
criterion_main!(benches);
