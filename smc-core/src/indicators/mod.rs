//! Indicator library.
//!
//! Indicators are pure functions: bar history in, numeric series out. The
//! snapshot type bundles the handful of values the scorer needs at the last
//! bar of an as-of slice.

pub mod atr;
pub mod relative_volume;
pub mod rsi;
pub mod sma;
pub mod snapshot;
pub mod trend;

pub use atr::{true_range, Atr};
pub use relative_volume::{neutral_relative_volume, RelativeVolume};
pub use rsi::Rsi;
pub use sma::{sma_at, Sma};
pub use snapshot::IndicatorSnapshot;
pub use trend::{performance, trend_and_cross, TrendState};

use crate::domain::PriceBar;

/// Trait for series indicators.
///
/// `compute` returns a vector the same length as `bars`; the first
/// `lookback()` values are `f64::NAN` (warmup).
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on bar t+1 or later. Every indicator must
/// pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_50", "rsi_14").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;

    /// Value at the last bar, `None` while still warming up.
    fn last(&self, bars: &[PriceBar]) -> Option<f64> {
        self.compute(bars).last().copied().filter(|v| v.is_finite())
    }
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
