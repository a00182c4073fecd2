#![allow(missing_docs)]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use haptic_benches::terrain;
use haptic_core::math::Vec3;
use haptic_geom::World;
use haptic_proxy::{ProxyForceAlgorithm, ProxySettings};
use std::time::Duration;

fn world(cells: usize, radius: f64) -> World {
    let mut world = World::new();
    world.add_mesh(terrain(cells, 0.002, 3));
    world.build_collision_indices(radius).expect("build");
    world
}

/// The device traces a circle 5 mm under the surface, so every tick is in
/// contact and slides through the friction cone.
fn bench_sliding_contact(c: &mut Criterion) {
    let mut group = c.benchmark_group("proxy_tick_sliding");
    let settings = ProxySettings::default();
    for &cells in &[16usize, 64] {
        let mut algorithm =
            ProxyForceAlgorithm::new(settings).expect("default settings are valid");
        algorithm.initialize(world(cells, settings.radius), Vec3::new(0.2, 0.0, 0.1));
        let mut phase = 0.0f64;
        group.bench_function(BenchmarkId::from_parameter(2 * cells * cells), |b| {
            b.iter(|| {
                phase += 1e-3;
                let device = Vec3::new(0.2 * phase.cos(), 0.2 * phase.sin(), -0.005);
                criterion::black_box(algorithm.compute_forces(device))
            });
        });
    }
    group.finish();
}

/// Free-space ticks: the proxy just follows the device.
fn bench_free_space(c: &mut Criterion) {
    let settings = ProxySettings::default();
    let mut algorithm = ProxyForceAlgorithm::new(settings).expect("default settings are valid");
    algorithm.initialize(world(64, settings.radius), Vec3::new(0.0, 0.0, 0.2));
    let mut phase = 0.0f64;
    c.bench_function("proxy_tick_free_space", |b| {
        b.iter(|| {
            phase += 1e-3;
            let device = Vec3::new(0.1 * phase.cos(), 0.1 * phase.sin(), 0.2);
            criterion::black_box(algorithm.compute_forces(device))
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(5))
        .sample_size(50);
    targets = bench_sliding_contact, bench_free_space
}
criterion_main!(benches);
