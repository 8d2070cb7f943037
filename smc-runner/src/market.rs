//! Market context over time: benchmark and timeframe series that the walk
//! cuts at every simulated date.
//!
//! Weekly and intraday bars are matched by their own date, so a weekly bar
//! must be dated by the last session it covers.

use chrono::NaiveDate;
use smc_core::domain::{PriceBar, PriceSeries};
use smc_core::mtf::MtfConfirmation;
use smc_core::regime::{assess_market, MarketRegime};
use smc_core::MarketContext;

/// Companion series for a backtest. Missing series contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct MarketHistory {
    /// Broad-market benchmark (SPY-like).
    pub broad: Option<PriceSeries>,
    /// Growth benchmark (QQQ-like).
    pub growth: Option<PriceSeries>,
    pub intraday: Option<PriceSeries>,
    pub weekly: Option<PriceSeries>,
}

impl MarketHistory {
    /// No companion data: neutral regime and no timeframe confirmation.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// The regime for `date`, from benchmark bars dated on or before it.
    pub fn regime_on(&self, date: NaiveDate) -> MarketRegime {
        match (cut(&self.broad, date), cut(&self.growth, date)) {
            (Some(broad), Some(growth)) => assess_market(broad, growth),
            _ => MarketRegime::Neutral,
        }
    }

    /// Context for an evaluation as of `date`.
    pub fn context_on(&self, date: NaiveDate) -> MarketContext {
        MarketContext {
            market_bonus: self.regime_on(date).bonus(),
            mtf: MtfConfirmation::from_series(cut(&self.intraday, date), cut(&self.weekly, date)),
        }
    }
}

fn cut(series: &Option<PriceSeries>, date: NaiveDate) -> Option<&[PriceBar]> {
    series.as_ref().map(|s| s.through_date(date))
}
