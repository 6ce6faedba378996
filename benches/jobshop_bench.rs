//! Criterion benchmarks for schedule building and annealing.
//!
//! Instance sizes follow the standard scenarios (50 jobs) plus a larger
//! one to show how schedule construction scales.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_jobshop::jobshop::{
    anneal, build_schedule, AnnealConfig, DurationRange, JobOrder, OperationTimeTable,
};
use u_jobshop::sa::create_rng;

fn bench_build_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_schedule");

    for (jobs, ops, machines) in [(50usize, 3usize, 5usize), (50, 5, 3), (500, 10, 4)] {
        let mut rng = create_rng(42);
        let table =
            OperationTimeTable::random(jobs, ops, &DurationRange::default(), &mut rng).unwrap();
        let order = JobOrder::random(jobs, &mut rng);
        group.bench_with_input(
            BenchmarkId::new(format!("j{}_n{}_m{}", jobs, ops, machines), jobs),
            &(table, order),
            |b, (t, o)| {
                b.iter(|| {
                    let schedule = build_schedule(black_box(o), black_box(t), machines);
                    black_box(schedule)
                })
            },
        );
    }
    group.finish();
}

fn bench_anneal(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal");
    group.sample_size(10);

    for (jobs, ops, machines) in [(50usize, 3usize, 5usize), (50, 5, 3)] {
        let config = AnnealConfig::default();
        group.bench_with_input(
            BenchmarkId::new(format!("j{}_n{}_m{}", jobs, ops, machines), jobs),
            &config,
            |b, cfg| {
                b.iter(|| {
                    let mut rng = create_rng(42);
                    let outcome = anneal(jobs, ops, machines, None, black_box(cfg), &mut rng);
                    black_box(outcome)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build_schedule, bench_anneal);
criterion_main!(benches);
