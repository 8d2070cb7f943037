//! Swing and pattern detectors.
//!
//! Every detector is a pure, total function of a bar slice: it never reads
//! past the end of the slice it is given and it answers short or degenerate
//! input with a neutral result instead of an error.

pub mod fvg;
pub mod levels;
pub mod liquidity;
pub mod order_block;
pub mod structure;
pub mod swing;

pub use fvg::{find_fair_value_gap, FairValueGap};
pub use levels::{analyze_levels, derive_stop, LevelFallback, SmcLevels};
pub use liquidity::{detect_sweep, LiquiditySweep, SweepKind};
pub use order_block::{find_order_blocks, OrderBlock};
pub use structure::{detect_structure_break, BreakClass, MarketStructureBreak};
pub use swing::{find_swings, SwingKind, SwingPoint};

use crate::domain::PriceBar;

/// The trailing `window` bars of a slice (the whole slice if shorter).
pub fn trailing(bars: &[PriceBar], window: usize) -> &[PriceBar] {
    &bars[bars.len().saturating_sub(window)..]
}

/// Bar builder for detector tests: explicit OHLCV on consecutive days.
#[cfg(test)]
pub(crate) fn bar(i: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> PriceBar {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    PriceBar::new(
        base + chrono::Duration::days(i as i64),
        open,
        high,
        low,
        close,
        volume,
    )
}

/// Bars from (high, low) pairs with the body in the middle of the range.
#[cfg(test)]
pub(crate) fn bars_from_ranges(ranges: &[(f64, f64)]) -> Vec<PriceBar> {
    ranges
        .iter()
        .enumerate()
        .map(|(i, &(h, l))| {
            let mid = (h + l) / 2.0;
            bar(i, mid, h, l, mid, 1000.0)
        })
        .collect()
}
