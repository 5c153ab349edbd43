use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::prelude::*;

use newton_sandbox::physics::{Bounds, Mode, Scene, resolve_collisions};

const DT: f64 = 1.0 / 90.0;

fn seeded_scene(mode: Mode) -> Scene {
    let mut scene = Scene::new(mode, Bounds::centered(1280.0, 800.0));
    let mut rng = StdRng::seed_from_u64(42);
    scene
        .rebuild(mode, &mut rng)
        .expect("bench scene should build");
    // settle into a state with some contacts
    for _ in 0..200 {
        scene.advance_one_tick(DT);
    }
    scene
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance_one_tick");
    for mode in [Mode::Standard, Mode::Planetarium] {
        let base = seeded_scene(mode);
        group.bench_function(mode.to_string(), |b| {
            b.iter_batched_ref(
                || base.clone(),
                |scene| scene.advance_one_tick(black_box(DT)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_collisions(c: &mut Criterion) {
    let scene = seeded_scene(Mode::Standard);
    let forces = scene.field().forces(Mode::Standard, scene.bodies(), DT);
    c.bench_function("resolve_collisions", |b| {
        b.iter_batched_ref(
            || scene.bodies().to_vec(),
            |bodies| resolve_collisions(bodies, black_box(&forces), DT),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_tick, bench_collisions);
criterion_main!(benches);
