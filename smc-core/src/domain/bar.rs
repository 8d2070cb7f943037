//! PriceBar: one daily OHLCV observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for a single instrument on a single day.
///
/// Prices are strictly positive and volume is non-negative. The OHLC
/// ordering invariant is `low <= min(open, close) <= max(open, close) <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Reasons a bar is rejected from a series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {date}: non-finite field")]
    NonFinite { date: NaiveDate },
    #[error("bar {date}: prices must be > 0")]
    NonPositivePrice { date: NaiveDate },
    #[error("bar {date}: negative volume {volume}")]
    NegativeVolume { date: NaiveDate, volume: f64 },
    #[error("bar {date}: OHLC ordering violated (o={open}, h={high}, l={low}, c={close})")]
    OhlcOrdering {
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
    #[error("bar {date} is not after previous bar {previous}")]
    OutOfOrder {
        date: NaiveDate,
        previous: NaiveDate,
    },
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check the bar in isolation (ordering against neighbours is the series' job).
    pub fn validate(&self) -> Result<(), BarError> {
        let date = self.date;
        if !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite())
        {
            return Err(BarError::NonFinite { date });
        }
        if self.open <= 0.0 || self.high <= 0.0 || self.low <= 0.0 || self.close <= 0.0 {
            return Err(BarError::NonPositivePrice { date });
        }
        if self.volume < 0.0 {
            return Err(BarError::NegativeVolume {
                date,
                volume: self.volume,
            });
        }
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        if self.low > body_low || body_high > self.high {
            return Err(BarError::OhlcOrdering {
                date,
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            });
        }
        Ok(())
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Absolute candle body size.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Distance from the low to the bottom of the body.
    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }
}
