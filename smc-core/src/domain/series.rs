//! PriceSeries: the immutable, date-ordered bar history of one instrument.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bar::{BarError, PriceBar};

/// A bar that was dropped while building a series.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedBar {
    /// Position of the bar in the input sequence.
    pub index: usize,
    pub error: BarError,
}

/// Chronologically ordered, gap-tolerant bar history.
///
/// Built once through [`PriceSeries::from_bars`]; no mutation afterwards.
/// Every detector receives a prefix slice (`up_to`) so it can never read bars
/// beyond the as-of index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, dropping malformed or out-of-order bars one by one.
    ///
    /// Returns the series together with the rejected bars. A bad bar never
    /// invalidates the rest of the history.
    pub fn from_bars(
        symbol: impl Into<String>,
        bars: impl IntoIterator<Item = PriceBar>,
    ) -> (Self, Vec<RejectedBar>) {
        let mut kept: Vec<PriceBar> = Vec::new();
        let mut rejected = Vec::new();

        for (index, bar) in bars.into_iter().enumerate() {
            if let Err(error) = bar.validate() {
                rejected.push(RejectedBar { index, error });
                continue;
            }
            if let Some(prev) = kept.last() {
                if bar.date <= prev.date {
                    rejected.push(RejectedBar {
                        index,
                        error: BarError::OutOfOrder {
                            date: bar.date,
                            previous: prev.date,
                        },
                    });
                    continue;
                }
            }
            kept.push(bar);
        }

        (
            Self {
                symbol: symbol.into(),
                bars: kept,
            },
            rejected,
        )
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bars `[0, as_of]` inclusive. Clamped to the series length.
    pub fn up_to(&self, as_of: usize) -> &[PriceBar] {
        let end = (as_of + 1).min(self.bars.len());
        &self.bars[..end]
    }

    /// Bars dated on or before `date`. Used to cut companion series (benchmarks,
    /// other timeframes) at the as-of date of the instrument being walked.
    pub fn through_date(&self, date: NaiveDate) -> &[PriceBar] {
        let end = self.bars.partition_point(|b| b.date <= date);
        &self.bars[..end]
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// A new series truncated to `len` bars (used by look-ahead tests and batch slicing).
    pub fn truncated(&self, len: usize) -> Self {
        Self {
            symbol: self.symbol.clone(),
            bars: self.bars[..len.min(self.bars.len())].to_vec(),
        }
    }
}
