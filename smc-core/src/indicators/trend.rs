//! Long-term trend, golden cross and trailing performance.

use serde::{Deserialize, Serialize};

use super::sma_at;
use crate::domain::PriceBar;

/// Trend state at the last bar of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendState {
    /// `close > SMA(slow)`. False while the slow SMA is undefined.
    pub trend_up: bool,
    /// Fast SMA is above the slow SMA now and was at or below it
    /// `cross_lookback` bars ago.
    pub golden_cross: bool,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
}

pub fn trend_and_cross(
    bars: &[PriceBar],
    fast: usize,
    slow: usize,
    cross_lookback: usize,
) -> TrendState {
    let Some(last) = bars.len().checked_sub(1) else {
        return TrendState::default();
    };
    let close = bars[last].close;
    let sma_fast = sma_at(bars, fast, last);
    let sma_slow = sma_at(bars, slow, last);

    let trend_up = sma_slow.is_some_and(|s| close > s);

    let golden_cross = match (sma_fast, sma_slow, last.checked_sub(cross_lookback)) {
        (Some(f), Some(s), Some(prev)) if f > s => {
            match (sma_at(bars, fast, prev), sma_at(bars, slow, prev)) {
                (Some(pf), Some(ps)) => pf <= ps,
                _ => false,
            }
        }
        _ => false,
    };

    TrendState {
        trend_up,
        golden_cross,
        sma_fast,
        sma_slow,
    }
}

/// Percent change of close from `lookback` bars ago to the last close.
/// 0 with fewer than `lookback + 1` bars.
pub fn performance(bars: &[PriceBar], lookback: usize) -> f64 {
    let n = bars.len();
    if n < lookback + 1 {
        return 0.0;
    }
    let then = bars[n - 1 - lookback].close;
    if then <= 0.0 {
        return 0.0;
    }
    (bars[n - 1].close - then) / then * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn trend_undefined_without_slow_sma() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let state = trend_and_cross(&bars, 2, 5, 1);
        assert!(!state.trend_up);
        assert!(!state.golden_cross);
        assert_eq!(state.sma_slow, None);
    }

    #[test]
    fn trend_up_above_slow_sma() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let state = trend_and_cross(&make_bars(&closes), 2, 5, 1);
        assert!(state.trend_up);
    }

    #[test]
    fn golden_cross_detected_on_fresh_crossover() {
        // Long decline then a sharp rally pulls the fast SMA through the slow one.
        let mut closes: Vec<f64> = (0..20).map(|i| 120.0 - i as f64).collect();
        closes.extend([110.0, 125.0, 140.0]);
        let bars = make_bars(&closes);
        let state = trend_and_cross(&bars, 2, 6, 3);

        let n = bars.len() - 1;
        let before_fast = sma_at(&bars, 2, n - 3).unwrap();
        let before_slow = sma_at(&bars, 6, n - 3).unwrap();
        assert!(before_fast <= before_slow);
        assert!(state.sma_fast.unwrap() > state.sma_slow.unwrap());
        assert!(state.golden_cross);
    }

    #[test]
    fn no_golden_cross_when_already_above() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let state = trend_and_cross(&make_bars(&closes), 2, 6, 2);
        assert!(!state.golden_cross);
    }

    #[test]
    fn performance_basic() {
        let bars = make_bars(&[100.0, 105.0, 110.0]);
        assert_approx(performance(&bars, 2), 10.0, 1e-12);
        assert_approx(performance(&bars, 1), 100.0 * 5.0 / 105.0, 1e-12);
    }

    #[test]
    fn performance_short_history_is_zero() {
        let bars = make_bars(&[100.0, 105.0]);
        assert_eq!(performance(&bars, 30), 0.0);
    }
}
