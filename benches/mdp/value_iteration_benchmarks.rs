use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mdp_value_iteration::mdp::build_grid_world;
use mdp_value_iteration::{Engine, State};

/// A ring of `n` states, each linked to its two neighbours, with one goal.
fn ring(n: usize) -> Engine {
    let mut engine = Engine::new();
    let ids: Vec<_> = (0..n)
        .map(|i| {
            let reward = if i == 0 { 1.0 } else { 0.0 };
            let state = State::create(format!("R{}", i), reward, 0.0, 0.7).unwrap();
            engine.add_state(state).unwrap()
        })
        .collect();
    for i in 0..n {
        engine.add_next_state(ids[i], ids[(i + 1) % n]).unwrap();
        engine.add_next_state(ids[i], ids[(i + n - 1) % n]).unwrap();
    }
    engine
}

fn bench_grid_world(c: &mut Criterion) {
    c.bench_function("grid_world_100_sweeps", |b| {
        b.iter(|| {
            let mut engine = build_grid_world(0.7, 0.9).unwrap();
            engine.perform_iterations(black_box(100)).unwrap();
            engine
        })
    });
}

fn bench_ring_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_single_sweep");
    for &size in &[100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut engine = ring(size);
            b.iter(|| engine.perform_iteration_step().unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_grid_world, bench_ring_sweep);
criterion_main!(benches);
