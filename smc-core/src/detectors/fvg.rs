//! Bullish fair-value-gap detection.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

/// Bars averaged for the "normal" daily range.
const RANGE_BARS: usize = 20;

/// A three-bar gap: `low[i]` clears `high[i-2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairValueGap {
    /// Top of the first bar of the pattern (`high[i-2]`).
    pub level: f64,
    /// Index of the first bar of the pattern within the scanned slice.
    pub origin_index: usize,
    pub size: f64,
}

/// First gap, oldest first, larger than `range_factor` times the average
/// range of the last 20 bars whose level sits below `equilibrium`.
///
/// The pattern's completing bar is never one of the first three bars of the
/// window, so the oldest candidate starts at bar 1.
pub fn find_fair_value_gap(
    window: &[PriceBar],
    equilibrium: f64,
    range_factor: f64,
) -> Option<FairValueGap> {
    let n = window.len();
    if n < 4 {
        return None;
    }
    let tail = &window[n.saturating_sub(RANGE_BARS)..];
    let avg_range = tail.iter().map(PriceBar::range).sum::<f64>() / tail.len() as f64;
    let min_gap = avg_range * range_factor;

    (3..n).find_map(|i| {
        let level = window[i - 2].high;
        let gap = window[i].low - level;
        (gap > min_gap && level < equilibrium).then_some(FairValueGap {
            level,
            origin_index: i - 2,
            size: gap,
        })
    })
}
