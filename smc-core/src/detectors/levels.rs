//! Smart-money level analysis over the trailing window.
//!
//! Produces buy-side liquidity (window high, used as the take-profit),
//! sell-side liquidity (window low), the equilibrium midpoint, an entry
//! anchor and a protective stop. The entry anchor is the swept level when a
//! sweep exists, otherwise a fair-value gap below equilibrium, otherwise the
//! equilibrium itself.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fvg::{find_fair_value_gap, FairValueGap};
use super::liquidity::{detect_sweep, LiquiditySweep};
use super::swing::{find_swings, SwingKind};
use super::trailing;
use crate::config::{StopRule, StrategyConfig};
use crate::domain::{PriceBar, TradeSetup};
use crate::indicators::{Atr, Indicator};

/// Swing lows before this offset in the window are ignored by the sweep rule.
const SWING_LOW_START: usize = 5;

const SHORT_TARGET: f64 = 1.05;
const SHORT_SSL: f64 = 0.95;
const SHORT_STOP: f64 = 0.94;
const NO_SWING_STOP: f64 = 0.99;

/// Which degenerate path produced the levels, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelFallback {
    /// Fewer bars than the analysis window.
    ShortHistory,
    /// No swing low inside the window.
    NoSwingLow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmcLevels {
    pub buy_side_liquidity: f64,
    pub sell_side_liquidity: f64,
    pub equilibrium: f64,
    pub entry: f64,
    pub stop: f64,
    pub fvg: Option<FairValueGap>,
    pub sweep: LiquiditySweep,
    pub fallback: Option<LevelFallback>,
}

impl SmcLevels {
    pub fn take_profit(&self) -> f64 {
        self.buy_side_liquidity
    }

    pub fn setup(&self) -> TradeSetup {
        TradeSetup::new(self.entry, self.stop, self.take_profit())
    }

    /// A gap or a sweep was found.
    pub fn has_pattern(&self) -> bool {
        self.fvg.is_some() || self.sweep.is_found()
    }

    fn short_history(close: f64) -> Self {
        Self {
            buy_side_liquidity: close * SHORT_TARGET,
            sell_side_liquidity: close * SHORT_SSL,
            equilibrium: close,
            entry: close,
            stop: close * SHORT_STOP,
            fvg: None,
            sweep: LiquiditySweep::none(),
            fallback: Some(LevelFallback::ShortHistory),
        }
    }
}

pub fn analyze_levels(bars: &[PriceBar], config: &StrategyConfig) -> SmcLevels {
    let close = bars.last().map_or(0.0, |b| b.close);
    if bars.len() < config.window {
        debug!(bars = bars.len(), window = config.window, "short history, degenerate levels");
        return SmcLevels::short_history(close);
    }

    let recent = trailing(bars, config.window);
    let bsl = recent.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let ssl = recent.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let eq = (bsl + ssl) / 2.0;

    let last_swing_low = find_swings(recent)
        .into_iter()
        .filter(|s| s.kind == SwingKind::Low && s.index >= SWING_LOW_START)
        .last()
        .map(|s| s.price);

    let Some(swing_low) = last_swing_low else {
        debug!(window = config.window, "no swing low in window, degenerate levels");
        return SmcLevels {
            buy_side_liquidity: bsl,
            sell_side_liquidity: ssl,
            equilibrium: eq,
            entry: eq,
            stop: ssl * NO_SWING_STOP,
            fvg: None,
            sweep: LiquiditySweep::none(),
            fallback: Some(LevelFallback::NoSwingLow),
        };
    };

    let sweep = detect_sweep(recent, Some(swing_low), config.sweep_scan_bars);
    let (entry, fvg) = match sweep.entry_anchor(config.entry_anchor_factor) {
        Some(anchor) => (anchor, None),
        None => match find_fair_value_gap(recent, eq, config.fvg_range_factor) {
            Some(gap) => (gap.level, Some(gap)),
            None => (eq, None),
        },
    };

    SmcLevels {
        buy_side_liquidity: bsl,
        sell_side_liquidity: ssl,
        equilibrium: eq,
        entry,
        stop: derive_stop(recent, entry, &sweep, config),
        fvg,
        sweep,
        fallback: None,
    }
}

/// Protective stop for `entry`, always strictly below it.
///
/// `WindowLow` uses `window_low * stop_floor_factor`; `SweepAtr` uses the
/// sweeping bar's low minus one ATR, falling back to the window rule when
/// there is no sweep or ATR is still warming up. A result at or above entry
/// (or not positive) is replaced by `entry * stop_clamp_factor`.
pub fn derive_stop(
    window: &[PriceBar],
    entry: f64,
    sweep: &LiquiditySweep,
    config: &StrategyConfig,
) -> f64 {
    let window_low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let floor_stop = window_low * config.stop_floor_factor;

    let raw = match config.stop_rule {
        StopRule::WindowLow => floor_stop,
        StopRule::SweepAtr => {
            match (sweep.trigger_low, Atr::new(config.atr_period).last(window)) {
                (Some(low), Some(atr)) => low - atr,
                _ => floor_stop,
            }
        }
    };

    if raw.is_finite() && raw > 0.0 && raw < entry {
        raw
    } else {
        entry * config.stop_clamp_factor
    }
}
