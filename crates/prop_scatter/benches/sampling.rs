mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use mint::Vector3;
use prop_scatter::sampling::{NoGround, NoObstacles, PlacementConstraints, SpatialSampler, Volume};
use rand::rngs::StdRng;
use rand::SeedableRng;

const MAX_ATTEMPTS: [u32; 4] = [1, 8, 32, 128];

fn flat_ground(origin: Vector3<f32>, _dir: Vector3<f32>, _max: f32) -> Option<Vector3<f32>> {
    Some(Vector3 {
        x: origin.x,
        y: 0.0,
        z: origin.z,
    })
}

fn sampling_unconstrained(c: &mut Criterion) {
    let volume = Volume::new(Vec3::ZERO, Vec3::splat(10.0));
    let sampler = SpatialSampler::new(
        volume,
        PlacementConstraints::new().with_random_rotation(true),
    );
    let mut rng = StdRng::seed_from_u64(0xE66);

    let mut group = c.benchmark_group("sampling/unconstrained");
    group.throughput(common::instances_throughput(1));
    group.bench_function("sample", |b| {
        b.iter(|| black_box(sampler.sample(&NoGround, &NoObstacles, &mut rng)));
    });
    group.finish();
}

fn sampling_snapped(c: &mut Criterion) {
    let volume = Volume::new(Vec3::new(0.0, 2.0, 0.0), Vec3::splat(5.0));
    let sampler = SpatialSampler::new(
        volume,
        PlacementConstraints::new()
            .with_random_rotation(true)
            .with_snap_to_ground(true),
    );
    let mut rng = StdRng::seed_from_u64(0x6A0);

    let mut group = c.benchmark_group("sampling/snap_to_ground");
    group.throughput(common::instances_throughput(1));
    group.bench_function("sample", |b| {
        b.iter(|| black_box(sampler.sample(&flat_ground, &NoObstacles, &mut rng)));
    });
    group.finish();
}

/// Worst case: every candidate overlaps, so each call spends its whole budget.
fn sampling_saturated(c: &mut Criterion) {
    let volume = Volume::new(Vec3::ZERO, Vec3::splat(10.0));
    let blocked = |_: Vector3<f32>, _: f32| -> Vec<u32> { vec![0] };

    let mut group = c.benchmark_group("sampling/saturated");
    for &attempts in &MAX_ATTEMPTS {
        let sampler = SpatialSampler::new(
            volume,
            PlacementConstraints::new()
                .with_avoid_overlap(1.0)
                .with_max_attempts(attempts),
        );
        let mut rng = StdRng::seed_from_u64(0x5A7 ^ attempts as u64);
        group.throughput(common::instances_throughput(attempts as usize));
        group.bench_with_input(
            BenchmarkId::from_parameter(attempts),
            &attempts,
            |b, _| {
                b.iter(|| black_box(sampler.sample(&NoGround, &blocked, &mut rng).is_err()));
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = sampling_unconstrained, sampling_snapped, sampling_saturated
}
criterion_main!(benches);
