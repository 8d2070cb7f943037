//! End-to-end scenarios on engineered series.

use chrono::NaiveDate;
use smc_core::detectors::{analyze_levels, detect_sweep, trailing, LevelFallback, SweepKind};
use smc_core::domain::{PriceBar, PriceSeries};
use smc_core::indicators::{neutral_relative_volume, Indicator, RelativeVolume};
use smc_core::{evaluate, MarketContext, Signal, StrategyConfig, WaitReason};

fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 3).unwrap() + chrono::Duration::days(i as i64)
}

/// Rising zigzag: lows follow `100 + 0.5 i` plus a 4-bar wave, bars are
/// 2.0 tall with bullish bodies.
fn uptrend(n: usize) -> Vec<PriceBar> {
    const WAVE: [f64; 4] = [0.0, 1.5, 3.0, 1.5];
    (0..n)
        .map(|i| {
            let low = 100.0 + 0.5 * i as f64 + WAVE[i % 4];
            PriceBar::new(day(i), low + 0.5, low + 2.0, low, low + 1.5, 1_000_000.0)
        })
        .collect()
}

/// Uptrend with one bearish bar at `at` that breaks the 20-bar reference low
/// by 2% and closes 1% above it on 1.5x volume. Returns the bars and the
/// reference low.
fn uptrend_with_sweep(n: usize, at: usize) -> (Vec<PriceBar>, f64) {
    let mut bars = uptrend(n);
    let config = StrategyConfig::default();
    // Reference lows come from the bars before the scan window.
    let scan_start = at + 1 - config.sweep_scan_bars;
    let low_20 = bars[scan_start - 20..scan_start]
        .iter()
        .map(|b| b.low)
        .fold(f64::INFINITY, f64::min);
    let prev_close = bars[at - 1].close;
    bars[at] = PriceBar::new(
        day(at),
        prev_close,
        prev_close + 0.5,
        low_20 * 0.98,
        low_20 * 1.01,
        1_500_000.0,
    );
    (bars, low_20)
}

#[test]
fn engineered_bar_is_major_sweep() {
    let (bars, low_20) = uptrend_with_sweep(300, 200);
    let (series, rejected) = PriceSeries::from_bars("SYN", bars);
    assert!(rejected.is_empty());

    let config = StrategyConfig::default();
    let as_of = series.up_to(200);
    let window = trailing(as_of, config.window);

    let sweep = detect_sweep(window, None, config.sweep_scan_bars);
    assert_eq!(sweep.kind, SweepKind::Major);
    assert_eq!(sweep.reference_level, Some(low_20));
    let anchor = sweep.entry_anchor(config.entry_anchor_factor).unwrap();
    assert!((anchor - low_20 * 1.002).abs() < 1e-9);

    let levels = analyze_levels(as_of, &config);
    assert_eq!(levels.fallback, None);
    assert_eq!(levels.sweep.kind, SweepKind::Major);
    assert!((levels.entry - low_20 * 1.002).abs() < 1e-9);
    assert!(levels.fvg.is_none(), "a sweep takes priority over gaps");
}

#[test]
fn engineered_sweep_in_uptrend_goes_long() {
    let (bars, _) = uptrend_with_sweep(300, 200);
    let (series, _) = PriceSeries::from_bars("SYN", bars);
    let eval = evaluate(
        series.up_to(200),
        &MarketContext::default(),
        &StrategyConfig::default(),
    )
    .unwrap();

    assert!(eval.indicators.trend_up);
    assert_eq!(eval.signal, Signal::Long);
    assert!(eval.setup.is_valid());
    assert!(eval.score.reasons.iter().any(|r| r.starts_with("Major sweep")));
    assert!(eval.strategy_count >= 1);
}

#[test]
fn flat_volume_gives_unit_relative_volume() {
    let bars = uptrend(60);
    let rvol = RelativeVolume::new(10);
    for k in 0..bars.len() {
        let value = neutral_relative_volume(rvol.last(&bars[..=k]));
        assert_eq!(value, 1.0, "bar {k}");
    }

    let mut silent = uptrend(30);
    for bar in &mut silent {
        bar.volume = 0.0;
    }
    for k in 0..silent.len() {
        assert_eq!(neutral_relative_volume(rvol.last(&silent[..=k])), 1.0);
    }
}

#[test]
fn forty_bars_fall_back_to_degenerate_levels() {
    let bars = uptrend(40);
    let close = bars[39].close;
    let eval = evaluate(&bars, &MarketContext::default(), &StrategyConfig::default()).unwrap();
    let lv = eval.levels;

    assert_eq!(lv.fallback, Some(LevelFallback::ShortHistory));
    assert!((lv.buy_side_liquidity - close * 1.05).abs() < 1e-9);
    assert!((lv.sell_side_liquidity - close * 0.95).abs() < 1e-9);
    assert_eq!(lv.equilibrium, close);
    assert_eq!(lv.entry, close);
    assert!((lv.stop - close * 0.94).abs() < 1e-9);
    assert!(lv.fvg.is_none());
    assert!(!lv.sweep.is_found());
    assert_eq!(eval.signal, Signal::Wait(WaitReason::Downtrend));
}

#[test]
fn premium_price_waits() {
    // Plain uptrend: the close sits at the top of the window.
    let bars = uptrend(260);
    let eval = evaluate(&bars, &MarketContext::default(), &StrategyConfig::default()).unwrap();
    assert!(eval.indicators.trend_up);
    assert_eq!(eval.signal, Signal::Wait(WaitReason::Premium));
}
