use std::sync::Arc;

use core_sim::{InMemoryEventSink, Market, SeededSource, SimConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use runtime::PriceTicker;

const BENCH_STEPS: u64 = 10_000;

fn bench_price_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_ticker");
    group.throughput(Throughput::Elements(BENCH_STEPS));

    group.bench_function(BenchmarkId::new("step_once", BENCH_STEPS), |b| {
        b.iter(|| {
            let market = Market::new(&SimConfig::default(), Box::new(SeededSource::new(7)));
            let mut ticker = PriceTicker::new(market.into_shared(), Arc::new(InMemoryEventSink::new()));
            for _ in 0..BENCH_STEPS {
                black_box(ticker.step_once());
            }
        });
    });

    group.finish();
}

fn bench_trades(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_trades");
    group.throughput(Throughput::Elements(BENCH_STEPS));

    group.bench_function(BenchmarkId::new("buy_then_sell", BENCH_STEPS), |b| {
        b.iter(|| {
            let mut market = Market::new(&SimConfig::default(), Box::new(SeededSource::new(13)));
            for step in 0..BENCH_STEPS {
                let action = if step % 2 == 0 { "buy" } else { "sell" };
                let _ = black_box(market.trade(action, 1));
                market.advance();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_price_ticks, bench_trades);
criterion_main!(benches);
