//! Criterion benchmarks for tile-gp.
//!
//! Measures tree sampling, fitness evaluation and full runs on the builtin
//! levels.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tile_gp::gp::fitness::evaluate;
use tile_gp::gp::{GpConfig, GpRunner, Node, Tree};
use tile_gp::level::Level;

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");

    for &height in &[3usize, 5, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(height), &height, |b, &h| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(Node::sample(&mut rng, black_box(h))))
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let mut rng = StdRng::seed_from_u64(42);
    let level = Level::classic();
    let trees: Vec<Node> = (0..64).map(|_| Node::sample(&mut rng, 6)).collect();

    group.bench_function("classic_64_trees", |b| {
        b.iter(|| {
            trees
                .iter()
                .map(|t| evaluate(black_box(t), black_box(&level)))
                .sum::<f64>()
        })
    });
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    group.sample_size(10);

    for (pop, gen) in [(50usize, 50usize), (200, 30), (1000, 10)] {
        let config = GpConfig::default()
            .with_population_size(pop)
            .with_max_generations(gen)
            .with_crossover_probability(0.9)
            .with_mutation_probability(0.3)
            .with_seed(42);
        let level = Level::classic();
        group.bench_with_input(
            BenchmarkId::new(format!("p{pop}_g{gen}"), pop),
            &(level, config),
            |b, (l, c)| {
                b.iter(|| {
                    let result = GpRunner::run(black_box(l), black_box(c));
                    black_box(result.best_fitness)
                })
            },
        );
    }
    group.finish();
}

fn bench_crossover(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let level = Arc::new(Level::classic());
    let mut a = Tree::random(&mut rng, 6, Arc::clone(&level));
    let mut b = Tree::random(&mut rng, 6, level);

    c.bench_function("crossover", |bench| {
        bench.iter(|| tile_gp::gp::operators::crossover(&mut a, &mut b, &mut rng))
    });
}

criterion_group!(benches, bench_sample, bench_evaluate, bench_crossover, bench_run);
criterion_main!(benches);
