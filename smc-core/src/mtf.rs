//! Multi-timeframe confirmation from optional finer and coarser series.
//!
//! Intraday: more than 50 bars and the last close above its SMA20 adds 10.
//! Weekly: more than 20 bars and the last close above its SMA10 adds 15.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;
use crate::indicators::{Indicator, Sma};

const INTRADAY_MIN_BARS: usize = 50;
const INTRADAY_SMA: usize = 20;
const INTRADAY_POINTS: i32 = 10;
const WEEKLY_MIN_BARS: usize = 20;
const WEEKLY_SMA: usize = 10;
const WEEKLY_POINTS: i32 = 15;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MtfConfirmation {
    pub score: i32,
    pub reasons: Vec<String>,
}

impl MtfConfirmation {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn confirmed(&self) -> bool {
        self.score > 0
    }

    pub fn from_series(intraday: Option<&[PriceBar]>, weekly: Option<&[PriceBar]>) -> Self {
        let mut out = Self::none();
        if let Some(bars) = intraday {
            if closes_above_sma(bars, INTRADAY_MIN_BARS, INTRADAY_SMA) {
                out.score += INTRADAY_POINTS;
                out.reasons.push("Intraday trend confirmed".into());
            }
        }
        if let Some(bars) = weekly {
            if closes_above_sma(bars, WEEKLY_MIN_BARS, WEEKLY_SMA) {
                out.score += WEEKLY_POINTS;
                out.reasons.push("Weekly trend bullish".into());
            }
        }
        out
    }
}

fn closes_above_sma(bars: &[PriceBar], min_bars: usize, period: usize) -> bool {
    if bars.len() <= min_bars {
        return false;
    }
    match (Sma::new(period).last(bars), bars.last()) {
        (Some(sma), Some(last)) => last.close > sma,
        _ => false,
    }
}
