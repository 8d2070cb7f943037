//! Batch backtests: one independent walk per instrument, run in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smc_core::domain::PriceSeries;
use tracing::{debug, info};

use crate::config::BacktestConfig;
use crate::market::MarketHistory;
use crate::metrics::profit_factor;
use crate::simulator::{run_walk_forward, BacktestResult, BacktestTrade};

/// Per-instrument line of the aggregate report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSummary {
    pub symbol: String,
    pub trade_count: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub total_return_pct: f64,
    pub max_drawdown_pct: f64,
}

/// Totals across every instrument that produced at least one trade.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateReport {
    pub instruments: Vec<InstrumentSummary>,
    pub trade_count: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub profit_factor: f64,
}

impl AggregateReport {
    /// Build the report, omitting results without trades.
    pub fn from_results(results: &[BacktestResult]) -> Self {
        let traded: Vec<&BacktestResult> = results.iter().filter(|r| !r.trades.is_empty()).collect();
        let all_trades: Vec<BacktestTrade> = traded
            .iter()
            .flat_map(|r| r.trades.iter().cloned())
            .collect();

        let wins: usize = traded.iter().map(|r| r.stats.wins).sum();
        let losses: usize = traded.iter().map(|r| r.stats.losses).sum();
        let trade_count = wins + losses;
        let win_rate = if trade_count == 0 {
            0.0
        } else {
            wins as f64 / trade_count as f64 * 100.0
        };

        Self {
            instruments: traded
                .iter()
                .map(|r| InstrumentSummary {
                    symbol: r.symbol.clone(),
                    trade_count: r.stats.trade_count,
                    win_rate: r.stats.win_rate,
                    total_pnl: r.stats.total_pnl,
                    total_return_pct: r.stats.total_return_pct,
                    max_drawdown_pct: r.stats.max_drawdown_pct,
                })
                .collect(),
            trade_count,
            wins,
            losses,
            win_rate,
            total_pnl: traded.iter().map(|r| r.stats.total_pnl).sum(),
            profit_factor: profit_factor(&all_trades),
        }
    }
}

/// Run the simulator over every series in parallel.
///
/// Results come back in input order. Series too short to simulate are
/// dropped.
pub fn run_batch(
    series: &[PriceSeries],
    config: &BacktestConfig,
    market: &MarketHistory,
) -> Vec<BacktestResult> {
    let results: Vec<BacktestResult> = series
        .par_iter()
        .filter_map(|s| {
            let result = run_walk_forward(s, config, market);
            if result.is_none() {
                debug!("{}: dropped from batch (insufficient history)", s.symbol());
            }
            result
        })
        .collect();
    info!(
        "batch: {} of {} instruments simulated",
        results.len(),
        series.len()
    );
    results
}
