//! Market-regime assessment from two benchmark series.
//!
//! Bullish when both benchmarks close above their SMA50 and the growth
//! benchmark also closes above its SMA20; bearish when both close below
//! their SMA50; neutral otherwise, including when either series is too short.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;
use crate::indicators::{Indicator, Sma};

const TREND_SMA: usize = 50;
const FAST_SMA: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketRegime {
    Bullish,
    Neutral,
    Bearish,
}

impl MarketRegime {
    /// Score adjustment handed to the scorer.
    pub fn bonus(&self) -> i32 {
        match self {
            MarketRegime::Bullish => 5,
            MarketRegime::Neutral => 0,
            MarketRegime::Bearish => -10,
        }
    }
}

pub fn assess_market(broad: &[PriceBar], growth: &[PriceBar]) -> MarketRegime {
    let trend = Sma::new(TREND_SMA);
    let fast = Sma::new(FAST_SMA);
    let (Some(broad_last), Some(growth_last)) = (broad.last(), growth.last()) else {
        return MarketRegime::Neutral;
    };
    let (Some(broad_50), Some(growth_50), Some(growth_20)) =
        (trend.last(broad), trend.last(growth), fast.last(growth))
    else {
        return MarketRegime::Neutral;
    };

    let (b, g) = (broad_last.close, growth_last.close);
    if b > broad_50 && g > growth_50 && g > growth_20 {
        MarketRegime::Bullish
    } else if b < broad_50 && g < growth_50 {
        MarketRegime::Bearish
    } else {
        MarketRegime::Neutral
    }
}
