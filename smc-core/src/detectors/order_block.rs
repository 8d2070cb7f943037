//! Bullish order-block detection.
//!
//! A candidate is a bearish bar with a body at least 0.8x the previous body,
//! volume above 1.3x the mean of the preceding 20 bars, and a following bar
//! whose close-to-close move is positive and at least half the candidate's
//! body. Candidates are ranked by `strength * volume_ratio`, highest first.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

const BODY_RATIO_MIN: f64 = 0.8;
const VOLUME_SPIKE: f64 = 1.3;
const VOLUME_BASELINE: usize = 20;
const MIN_FOLLOW_THROUGH: f64 = 0.5;
/// Bars needed beyond `lookback` before any scan happens.
const MIN_EXTRA_BARS: usize = 5;

/// A demand zone left by a volume-confirmed bearish candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBlock {
    pub zone_low: f64,
    /// Bottom of the candle body.
    pub zone_high: f64,
    /// Next bar's move over the candle body.
    pub strength: f64,
    pub volume_ratio: f64,
    pub origin_index: usize,
}

impl OrderBlock {
    pub fn rank(&self) -> f64 {
        self.strength * self.volume_ratio
    }
}

/// Scan bars `[lookback, len-1)` and keep the best `keep` candidates.
pub fn find_order_blocks(bars: &[PriceBar], lookback: usize, keep: usize) -> Vec<OrderBlock> {
    let n = bars.len();
    if n < lookback + MIN_EXTRA_BARS || lookback == 0 {
        return Vec::new();
    }

    let mut blocks = Vec::new();
    for i in lookback..n - 1 {
        let bar = &bars[i];
        if !bar.is_bearish() {
            continue;
        }
        let body = bar.body();
        if body < bars[i - 1].body() * BODY_RATIO_MIN {
            continue;
        }

        let baseline = &bars[i.saturating_sub(VOLUME_BASELINE)..i];
        let mean_volume = baseline.iter().map(|b| b.volume).sum::<f64>() / baseline.len() as f64;
        if mean_volume <= 0.0 || bar.volume <= mean_volume * VOLUME_SPIKE {
            continue;
        }

        let next_move = bars[i + 1].close - bar.close;
        if next_move <= 0.0 || next_move < body * MIN_FOLLOW_THROUGH {
            continue;
        }

        blocks.push(OrderBlock {
            zone_low: bar.low,
            zone_high: bar.open.min(bar.close),
            strength: next_move / body,
            volume_ratio: bar.volume / mean_volume,
            origin_index: i,
        });
    }

    // Stable: equal ranks keep chronological order.
    blocks.sort_by(|a, b| b.rank().total_cmp(&a.rank()));
    blocks.truncate(keep);
    blocks
}
