//! Benchmarks for the lifecycle scan.
//!
//! Measures one tick over registries of increasing size. The fill odds are
//! pinned so every tick scans the whole book.

use std::sync::Arc;

use chrono::{Duration, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use papertrex::{FillTable, LifecycleSimulator, Market, Odds, OrderRegistry, OrderSide};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Build a registry holding `n` open orders.
fn build_registry(n: usize) -> Arc<OrderRegistry> {
    let registry = Arc::new(OrderRegistry::new());
    let market = Market::new("BTC-ETH").unwrap();
    let opened = Utc::now();
    for i in 0..n {
        let side = if i % 2 == 0 {
            OrderSide::LimitBuy
        } else {
            OrderSide::LimitSell
        };
        registry
            .submit_at(side, market.clone(), 1.0 + i as f64, 0.01, opened)
            .unwrap();
    }
    registry
}

/// Benchmark: scan where every roll misses
fn bench_tick_nothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_nothing");

    for size in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let registry = build_registry(size);
            let sim = LifecycleSimulator::new(registry, FillTable::uniform(Odds::NEVER));
            let mut rng = StdRng::seed_from_u64(1);
            let now = Utc::now() + Duration::seconds(30);
            b.iter(|| black_box(sim.tick_at(now, &mut rng)));
        });
    }

    group.finish();
}

/// Benchmark: scan where every order is partly filled
fn bench_tick_partial(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_partial");

    for size in [100, 1_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let registry = build_registry(size);
            let sim = LifecycleSimulator::new(registry, FillTable::uniform(Odds::new(0, 100)));
            let mut rng = StdRng::seed_from_u64(2);
            let now = Utc::now() + Duration::seconds(90);
            b.iter(|| black_box(sim.tick_at(now, &mut rng)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick_nothing, bench_tick_partial);
criterion_main!(benches);
