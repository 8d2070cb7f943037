//! Look-ahead contamination tests.
//!
//! Invariant: nothing computed for bar t may depend on bar t+1 or later.
//!
//! Method: compute on a truncated series and on the full series and assert
//! the overlapping part is identical. For whole evaluations, two histories
//! that share a prefix but diverge afterwards must evaluate identically at
//! every as-of index inside the shared prefix.

use chrono::NaiveDate;
use smc_core::detectors::find_swings;
use smc_core::domain::{PriceBar, PriceSeries};
use smc_core::indicators::*;
use smc_core::{evaluate, MarketContext, StrategyConfig};

/// Deterministic pseudo-random walk using a simple LCG. `salt` changes the
/// path from `diverge_at` onwards so two series share only a prefix.
fn make_test_bars(n: usize, diverge_at: usize, salt: u64) -> Vec<PriceBar> {
    let base_date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        let s = if i >= diverge_at { salt } else { 0 };
        let seed = (i as u64 ^ s)
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let change = ((seed >> 33) % 200) as f64 * 0.03 - 2.9; // slight upward drift
        price = (price + change).max(10.0);

        let open = price - 0.4;
        let close = price + 0.3;
        let high = open.max(close) + 1.0 + ((seed >> 20) % 10) as f64 * 0.1;
        let low = open.min(close) - 1.0 - ((seed >> 24) % 10) as f64 * 0.1;
        let volume = 1_000_000.0 + ((seed >> 40) % 500) as f64 * 2_000.0;

        bars.push(PriceBar::new(
            base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume,
        ));
    }
    bars
}

fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[PriceBar], truncated_len: usize) {
    let truncated = &full_bars[..truncated_len];
    let full_result = indicator.compute(full_bars);
    let truncated_result = indicator.compute(truncated);

    assert_eq!(truncated_result.len(), truncated_len);
    for i in 0..truncated_len {
        let (t, f) = (truncated_result[i], full_result[i]);
        if t.is_nan() && f.is_nan() {
            continue;
        }
        assert!(
            (t - f).abs() < 1e-10,
            "{}: look-ahead contamination at bar {i}: truncated={t}, full={f}",
            indicator.name()
        );
    }
}

#[test]
fn lookahead_indicators() {
    let bars = make_test_bars(300, 300, 0);
    assert_no_lookahead(&Sma::new(20), &bars, 150);
    assert_no_lookahead(&Sma::new(200), &bars, 250);
    assert_no_lookahead(&Rsi::new(14), &bars, 150);
    assert_no_lookahead(&Atr::new(14), &bars, 150);
    assert_no_lookahead(&RelativeVolume::new(10), &bars, 150);
}

#[test]
fn swing_points_settle_two_bars_late() {
    let bars = make_test_bars(200, 200, 0);
    let k = 120;
    let truncated = find_swings(&bars[..k]);
    let full: Vec<_> = find_swings(&bars)
        .into_iter()
        .filter(|s| s.index + 2 < k)
        .collect();
    assert_eq!(truncated, full);
}

#[test]
fn evaluation_ignores_bars_after_as_of() {
    let config = StrategyConfig::default();
    let market = MarketContext::default();
    let k = 260;
    let (a, _) = PriceSeries::from_bars("A", make_test_bars(320, k + 1, 0));
    let (b, _) = PriceSeries::from_bars("B", make_test_bars(320, k + 1, 0xDEAD_BEEF));
    assert_ne!(a.bars()[k + 10], b.bars()[k + 10], "futures must differ");

    for as_of in (60..=k).step_by(10) {
        let ea = evaluate(a.up_to(as_of), &market, &config).unwrap();
        let eb = evaluate(b.up_to(as_of), &market, &config).unwrap();
        assert_eq!(ea, eb, "evaluation at as_of={as_of} saw the future");
    }
}
