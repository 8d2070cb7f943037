//! Tunable constants of the detectors and the scorer.

use serde::{Deserialize, Serialize};

/// How the protective stop is derived from the analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopRule {
    /// `window_low * stop_floor_factor`.
    #[default]
    WindowLow,
    /// `sweep_trigger_low - 1 * ATR`; falls back to `WindowLow` without a sweep.
    SweepAtr,
}

/// Detector and scoring parameters.
///
/// Defaults reproduce the reference screener. Every field is optional in TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Trailing window for levels, structure and sweeps.
    pub window: usize,
    /// First bar index scanned for order blocks.
    pub order_block_lookback: usize,
    /// Order blocks kept after ranking.
    pub order_block_keep: usize,
    /// Most recent bars inspected for a liquidity sweep.
    pub sweep_scan_bars: usize,
    /// Entry anchor placed this factor above a swept level.
    pub entry_anchor_factor: f64,
    /// Minimum gap size as a fraction of the 20-bar average range.
    pub fvg_range_factor: f64,
    pub stop_rule: StopRule,
    pub stop_floor_factor: f64,
    /// Applied to the entry when a stop formula lands at or above it.
    pub stop_clamp_factor: f64,
    pub atr_period: usize,
    pub rsi_period: usize,
    pub rvol_window: usize,
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub golden_cross_lookback: usize,
    pub performance_lookback: usize,
    pub score_base: i32,
    /// Optional clamp on the final score. `None` leaves it unbounded.
    pub score_ceiling: Option<u32>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            window: 50,
            order_block_lookback: 30,
            order_block_keep: 5,
            sweep_scan_bars: 5,
            entry_anchor_factor: 1.002,
            fvg_range_factor: 0.3,
            stop_rule: StopRule::WindowLow,
            stop_floor_factor: 0.985,
            stop_clamp_factor: 0.95,
            atr_period: 14,
            rsi_period: 14,
            rvol_window: 10,
            sma_fast: 50,
            sma_slow: 200,
            golden_cross_lookback: 5,
            performance_lookback: 30,
            score_base: 50,
            score_ceiling: None,
        }
    }
}

impl StrategyConfig {
    /// Sanity checks on the parameters; returns a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        if self.window < 10 {
            return Err(format!("window must be >= 10, got {}", self.window));
        }
        if self.sweep_scan_bars == 0 || self.sweep_scan_bars >= self.window {
            return Err(format!(
                "sweep_scan_bars must be in 1..window, got {}",
                self.sweep_scan_bars
            ));
        }
        if self.order_block_keep == 0 {
            return Err("order_block_keep must be >= 1".into());
        }
        if self.sma_fast == 0 || self.sma_fast >= self.sma_slow {
            return Err(format!(
                "sma_fast ({}) must be > 0 and < sma_slow ({})",
                self.sma_fast, self.sma_slow
            ));
        }
        if self.rsi_period == 0 || self.rvol_window == 0 || self.atr_period == 0 {
            return Err("indicator periods must be >= 1".into());
        }
        if !(0.0..1.0).contains(&self.stop_floor_factor)
            || !(0.0..1.0).contains(&self.stop_clamp_factor)
        {
            return Err("stop factors must be in [0, 1)".into());
        }
        if self.entry_anchor_factor < 1.0 {
            return Err("entry_anchor_factor must be >= 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(StrategyConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_smas_rejected() {
        let cfg = StrategyConfig {
            sma_fast: 200,
            sma_slow: 50,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn sweep_scan_must_fit_window() {
        let cfg = StrategyConfig {
            sweep_scan_bars: 50,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
