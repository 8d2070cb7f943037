//! Backtest statistics: pure functions over the trade list and equity curve.
//!
//! Rates and returns are expressed in percent. Every function returns 0.0
//! rather than NaN when its denominator is empty.

use serde::{Deserialize, Serialize};

use crate::simulator::{BacktestTrade, TradeOutcome};

/// Aggregate statistics for a single walk-forward run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestStats {
    pub trade_count: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percent of trades that were wins.
    pub win_rate: f64,
    pub total_pnl: f64,
    pub average_win: f64,
    /// Mean pnl of losing trades (negative or zero).
    pub average_loss: f64,
    pub profit_factor: f64,
    pub final_equity: f64,
    pub total_return_pct: f64,
    /// Largest peak-to-trough decline, positive percent.
    pub max_drawdown_pct: f64,
}

impl BacktestStats {
    pub fn compute(trades: &[BacktestTrade], equity_curve: &[f64], starting_equity: f64) -> Self {
        let wins = count(trades, TradeOutcome::Win);
        let losses = count(trades, TradeOutcome::Loss);
        let total_pnl: f64 = trades.iter().map(|t| t.pnl).sum();
        let final_equity = equity_curve.last().copied().unwrap_or(starting_equity);

        Self {
            trade_count: trades.len(),
            wins,
            losses,
            win_rate: win_rate(trades),
            total_pnl,
            average_win: average_pnl(trades, TradeOutcome::Win),
            average_loss: average_pnl(trades, TradeOutcome::Loss),
            profit_factor: profit_factor(trades),
            final_equity,
            total_return_pct: total_return_pct(starting_equity, final_equity),
            max_drawdown_pct: max_drawdown_pct(equity_curve),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

fn count(trades: &[BacktestTrade], outcome: TradeOutcome) -> usize {
    trades.iter().filter(|t| t.outcome == outcome).count()
}

/// Percent of trades that were wins.
pub fn win_rate(trades: &[BacktestTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    count(trades, TradeOutcome::Win) as f64 / trades.len() as f64 * 100.0
}

/// Mean pnl of the trades with `outcome`; 0.0 when there are none.
pub fn average_pnl(trades: &[BacktestTrade], outcome: TradeOutcome) -> f64 {
    let (sum, n) = trades
        .iter()
        .filter(|t| t.outcome == outcome)
        .fold((0.0, 0usize), |(s, n), t| (s + t.pnl, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// `|sum(winning pnl) / sum(losing pnl)|`, 0.0 when nothing was lost.
pub fn profit_factor(trades: &[BacktestTrade]) -> f64 {
    let gross_win: f64 = trades
        .iter()
        .filter(|t| t.outcome == TradeOutcome::Win)
        .map(|t| t.pnl)
        .sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.outcome == TradeOutcome::Loss)
        .map(|t| t.pnl)
        .sum();

    if gross_loss == 0.0 {
        return 0.0;
    }
    (gross_win / gross_loss).abs()
}

pub fn total_return_pct(starting_equity: f64, final_equity: f64) -> f64 {
    if starting_equity <= 0.0 {
        return 0.0;
    }
    (final_equity - starting_equity) / starting_equity * 100.0
}

/// Largest peak-to-trough decline over the curve, as a positive percent.
pub fn max_drawdown_pct(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &eq in equity_curve {
        peak = peak.max(eq);
        if peak > 0.0 {
            worst = worst.max((peak - eq) / peak * 100.0);
        }
    }
    worst
}
