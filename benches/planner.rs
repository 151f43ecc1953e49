//! Benchmarks for closure computation and path planning.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skillpath::catalog::Catalog;
use skillpath::engine::{Engine, EngineConfig};
use skillpath::graph::closure::ClosureEngine;
use skillpath::graph::planner::PathPlanner;

fn bench_closure_cold(c: &mut Criterion) {
    let catalog = Catalog::bundled().unwrap();

    c.bench_function("closure_cold_all_topics", |bench| {
        bench.iter(|| {
            let closure = ClosureEngine::new(Arc::clone(catalog.graph()));
            closure.warm().unwrap();
            black_box(closure.cached())
        })
    });
}

fn bench_plan_fullstack(c: &mut Criterion) {
    let catalog = Catalog::bundled().unwrap();
    let closure = ClosureEngine::new(Arc::clone(catalog.graph()));
    closure.warm().unwrap();
    let topics = catalog
        .career_path("fullstack_developer")
        .unwrap()
        .topics
        .clone();

    c.bench_function("plan_fullstack_27", |bench| {
        bench.iter(|| black_box(PathPlanner::new(&closure).order(&topics).unwrap()))
    });
}

fn bench_next_topic(c: &mut Criterion) {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    engine
        .start_session("bench", "data_structures_algorithms")
        .unwrap();

    c.bench_function("next_topic_fresh_session", |bench| {
        bench.iter(|| black_box(engine.next_topic("bench").unwrap()))
    });
}

criterion_group!(
    benches,
    bench_closure_cold,
    bench_plan_fullstack,
    bench_next_topic
);
criterion_main!(benches);
