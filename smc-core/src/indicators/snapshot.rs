//! Indicator values at the last bar of an as-of slice.

use serde::{Deserialize, Serialize};

use super::{
    neutral_relative_volume, performance, trend_and_cross, Atr, Indicator, RelativeVolume, Rsi,
};
use crate::config::StrategyConfig;
use crate::domain::PriceBar;

/// The indicator bundle threaded into the scorer and the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// `None` while RSI is warming up.
    pub rsi: Option<f64>,
    /// Neutral 1.0 when undefined.
    pub relative_volume: f64,
    pub golden_cross: bool,
    pub trend_up: bool,
    pub performance_pct: f64,
    pub sma_slow: Option<f64>,
    pub atr: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn compute(bars: &[PriceBar], config: &StrategyConfig) -> Self {
        let trend = trend_and_cross(
            bars,
            config.sma_fast,
            config.sma_slow,
            config.golden_cross_lookback,
        );
        Self {
            rsi: Rsi::new(config.rsi_period).last(bars),
            relative_volume: neutral_relative_volume(
                RelativeVolume::new(config.rvol_window).last(bars),
            ),
            golden_cross: trend.golden_cross,
            trend_up: trend.trend_up,
            performance_pct: performance(bars, config.performance_lookback),
            sma_slow: trend.sma_slow,
            atr: Atr::new(config.atr_period).last(bars),
        }
    }
}
