//! Criterion benchmarks for the backtest walk and parallel batch.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use smc_core::domain::{PriceBar, PriceSeries};
use smc_runner::{run_batch, run_walk_forward, BacktestConfig, MarketHistory};

fn make_series(symbol: &str, n: usize, phase: f64) -> PriceSeries {
    let base_date = chrono::NaiveDate::from_ymd_opt(2018, 1, 2).unwrap();
    let bars: Vec<PriceBar> = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1 + phase).sin() * 10.0 + i as f64 * 0.05;
            let open = close - 0.3;
            PriceBar::new(
                base_date + chrono::Duration::days(i as i64),
                open,
                close + 1.5,
                open - 1.5,
                close,
                1_000_000.0 + (i % 37) as f64 * 10_000.0,
            )
        })
        .collect();
    PriceSeries::from_bars(symbol, bars).0
}

fn bench_walk(c: &mut Criterion) {
    let config = BacktestConfig {
        score_threshold: 0,
        ..Default::default()
    };
    let market = MarketHistory {
        broad: Some(make_series("SPY", 2000, 1.0)),
        growth: Some(make_series("QQQ", 2000, 2.0)),
        ..Default::default()
    };
    let mut group = c.benchmark_group("walk_forward");
    for n in [500usize, 2000] {
        let series = make_series("BENCH", n, 0.0);
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, s| {
            b.iter(|| run_walk_forward(black_box(s), &config, &market))
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let config = BacktestConfig::default();
    let market = MarketHistory::neutral();
    let universe: Vec<PriceSeries> = (0..16)
        .map(|i| make_series(&format!("S{i}"), 1000, i as f64))
        .collect();
    c.bench_function("batch_16x1000", |b| {
        b.iter(|| run_batch(black_box(&universe), &config, &market))
    });
}

criterion_group!(benches, bench_walk, bench_batch);
criterion_main!(benches);
