//! Walk-forward backtest simulator.
//!
//! Steps through as-of indices at a fixed stride. At each step the core
//! evaluation sees only `bars[..=as_of]` and a market context built from
//! companion bars dated on or before `bars[as_of].date`. The bars after
//! `as_of` are used solely to fill and resolve a trade that was already
//! decided. The setup's entry is a resting limit order: the position opens
//! only if a horizon bar trades down to it. Equity compounds across steps,
//! so the walk within one instrument is strictly sequential.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smc_core::domain::{PriceBar, PriceSeries, TradeSetup};
use smc_core::{evaluate, Evaluation, WaitReason};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{BacktestConfig, TieBreak};
use crate::market::MarketHistory;
use crate::metrics::BacktestStats;

/// Current schema version for serialized results.
pub const SCHEMA_VERSION: u32 = 1;

// ─── Trade records ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeOutcome {
    Win,
    Loss,
}

impl TradeOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            TradeOutcome::Win => "WIN",
            TradeOutcome::Loss => "LOSS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    Target,
    Stop,
    /// Neither level touched; closed at the last bar of the horizon.
    Horizon,
}

impl ExitReason {
    pub fn label(&self) -> &'static str {
        match self {
            ExitReason::Target => "target",
            ExitReason::Stop => "stop",
            ExitReason::Horizon => "horizon",
        }
    }
}

/// How a trade ended within its holding horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub exit_price: f64,
    /// Offset into the horizon slice of the exit bar.
    pub exit_offset: usize,
    pub exit_reason: ExitReason,
    pub outcome: TradeOutcome,
}

/// One simulated trade. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestTrade {
    /// Date of the bar that filled the entry.
    pub open_date: NaiveDate,
    pub exit_date: NaiveDate,
    /// As-of index that produced the signal.
    pub signal_index: usize,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub exit_price: f64,
    pub share_count: u64,
    pub outcome: TradeOutcome,
    pub exit_reason: ExitReason,
    pub pnl: f64,
    pub score_at_entry: u32,
    pub risk_reward_at_entry: f64,
}

// ─── Step log ───────────────────────────────────────────────────────

/// A step that could not be simulated. The walk continues past it.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum StepError {
    #[error("analysis failed: {0}")]
    Analysis(String),

    #[error("non-finite pnl for entry {entry} exit {exit} shares {shares}")]
    NonFinitePnl { entry: f64, exit: f64, shares: u64 },
}

/// What the simulator decided at one as-of index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum StepDecision {
    Wait { reason: WaitReason },
    BelowThreshold { score: u32 },
    /// Risk budget too small for a single share.
    Unsized { score: u32 },
    /// Qualified, but the holding horizon runs past the data.
    Unresolved { score: u32 },
    /// No bar in the horizon traded down to the entry.
    NotFilled { score: u32 },
    Traded { score: u32, trade_index: usize },
    Failed { error: StepError },
}

impl StepDecision {
    /// The signal and score passed the entry filters.
    pub fn qualified(&self) -> bool {
        matches!(
            self,
            StepDecision::Unsized { .. }
                | StepDecision::Unresolved { .. }
                | StepDecision::NotFilled { .. }
                | StepDecision::Traded { .. }
        )
    }

    /// Score of the evaluation, when the step got that far.
    pub fn score(&self) -> Option<u32> {
        match self {
            StepDecision::BelowThreshold { score }
            | StepDecision::Unsized { score }
            | StepDecision::Unresolved { score }
            | StepDecision::NotFilled { score }
            | StepDecision::Traded { score, .. } => Some(*score),
            StepDecision::Wait { .. } | StepDecision::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkStep {
    pub as_of: usize,
    pub date: NaiveDate,
    pub decision: StepDecision,
}

// ─── Result ─────────────────────────────────────────────────────────

/// Complete result of one walk-forward backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub run_id: String,
    /// BLAKE3 of the bars the walk ran over.
    pub dataset_hash: String,
    pub stats: BacktestStats,
    pub trades: Vec<BacktestTrade>,
    /// Starting equity followed by the equity after each trade.
    pub equity_curve: Vec<f64>,
    pub steps: Vec<WalkStep>,
    pub config: BacktestConfig,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl BacktestResult {
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }
}

// ─── Simulation ─────────────────────────────────────────────────────

/// Fixed-fractional position size: `floor(equity * risk_fraction / (entry - stop))`.
///
/// Zero when the per-share risk is not positive or any input is not finite.
pub fn position_size(equity: f64, risk_fraction: f64, entry: f64, stop: f64) -> u64 {
    let per_share = entry - stop;
    let budget = equity * risk_fraction;
    if !(per_share.is_finite() && budget.is_finite()) || per_share <= 0.0 || budget <= 0.0 {
        return 0;
    }
    (budget / per_share).floor() as u64
}

/// Resolve a long trade over `horizon`, the bars after the signal bar.
///
/// The first bar that touches the stop (`low <= stop`) or the target
/// (`high >= target`) ends the trade at that level. When one bar touches
/// both, `tie_break` decides. If neither is touched the trade closes at the
/// last close of the horizon. `None` for an empty horizon.
pub fn resolve_trade(
    horizon: &[PriceBar],
    setup: &TradeSetup,
    tie_break: TieBreak,
) -> Option<Resolution> {
    for (offset, bar) in horizon.iter().enumerate() {
        let stop_hit = bar.low <= setup.stop_loss;
        let target_hit = bar.high >= setup.take_profit;
        let reason = match (stop_hit, target_hit) {
            (true, true) => match tie_break {
                TieBreak::StopFirst => ExitReason::Stop,
                TieBreak::TargetFirst => ExitReason::Target,
            },
            (true, false) => ExitReason::Stop,
            (false, true) => ExitReason::Target,
            (false, false) => continue,
        };
        return Some(match reason {
            ExitReason::Stop => Resolution {
                exit_price: setup.stop_loss,
                exit_offset: offset,
                exit_reason: reason,
                outcome: TradeOutcome::Loss,
            },
            _ => Resolution {
                exit_price: setup.take_profit,
                exit_offset: offset,
                exit_reason: reason,
                outcome: TradeOutcome::Win,
            },
        });
    }

    let last = horizon.last()?;
    Some(close_at_horizon(last, horizon.len() - 1, setup))
}

/// Offset of the first horizon bar that trades at or below `entry`.
pub fn fill_offset(horizon: &[PriceBar], entry: f64) -> Option<usize> {
    horizon.iter().position(|bar| bar.low <= entry)
}

/// Resolve a position filled on `held[0]`.
///
/// The fill bar can stop the trade out but cannot reach the target: its
/// high may have printed before price came down to the entry.
fn resolve_from_fill(
    held: &[PriceBar],
    setup: &TradeSetup,
    tie_break: TieBreak,
) -> Option<Resolution> {
    let (fill_bar, rest) = held.split_first()?;
    if fill_bar.low <= setup.stop_loss {
        return Some(Resolution {
            exit_price: setup.stop_loss,
            exit_offset: 0,
            exit_reason: ExitReason::Stop,
            outcome: TradeOutcome::Loss,
        });
    }
    match resolve_trade(rest, setup, tie_break) {
        Some(r) => Some(Resolution {
            exit_offset: r.exit_offset + 1,
            ..r
        }),
        None => Some(close_at_horizon(fill_bar, 0, setup)),
    }
}

fn close_at_horizon(last: &PriceBar, offset: usize, setup: &TradeSetup) -> Resolution {
    let outcome = if last.close > setup.entry {
        TradeOutcome::Win
    } else {
        TradeOutcome::Loss
    };
    Resolution {
        exit_price: last.close,
        exit_offset: offset,
        exit_reason: ExitReason::Horizon,
        outcome,
    }
}

/// Replay `series` bar by bar.
///
/// `market` is cut at each step's date before it reaches the scorer.
/// Returns `None` when the series is shorter than `config.min_history`.
pub fn run_walk_forward(
    series: &PriceSeries,
    config: &BacktestConfig,
    market: &MarketHistory,
) -> Option<BacktestResult> {
    if series.len() < config.min_history || series.is_empty() {
        debug!(
            "{}: {} bars, below minimum history {}",
            series.symbol(),
            series.len(),
            config.min_history
        );
        return None;
    }

    let bars = series.bars();
    let stride = config.stride.max(1);
    let mut equity = config.starting_equity;
    let mut equity_curve = vec![equity];
    let mut trades: Vec<BacktestTrade> = Vec::new();
    let mut steps = Vec::new();

    for as_of in (config.warmup_bars..bars.len()).step_by(stride) {
        let context = market.context_on(bars[as_of].date);
        let decision = match evaluate(series.up_to(as_of), &context, &config.strategy) {
            Err(e) => StepDecision::Failed {
                error: StepError::Analysis(e.to_string()),
            },
            Ok(eval) => match step(bars, as_of, &eval, equity, config) {
                Ok(StepOutcome::Decided(d)) => d,
                Ok(StepOutcome::Opened(trade)) => {
                    equity += trade.pnl;
                    equity_curve.push(equity);
                    trades.push(trade);
                    StepDecision::Traded {
                        score: eval.score.value,
                        trade_index: trades.len() - 1,
                    }
                }
                Err(error) => StepDecision::Failed { error },
            },
        };

        match &decision {
            StepDecision::Failed { error } => {
                warn!("{} as_of={as_of}: step skipped: {error}", series.symbol())
            }
            d => debug!("{} as_of={as_of}: {d:?}", series.symbol()),
        }
        steps.push(WalkStep {
            as_of,
            date: bars[as_of].date,
            decision,
        });
    }

    let stats = BacktestStats::compute(&trades, &equity_curve, config.starting_equity);
    info!(
        "{}: {} trades, win rate {:.1}%, final equity {:.2}",
        series.symbol(),
        stats.trade_count,
        stats.win_rate,
        stats.final_equity
    );

    Some(BacktestResult {
        schema_version: SCHEMA_VERSION,
        symbol: series.symbol().to_string(),
        run_id: config.run_id(),
        dataset_hash: dataset_hash(bars),
        stats,
        trades,
        equity_curve,
        steps,
        config: config.clone(),
    })
}

enum StepOutcome {
    Decided(StepDecision),
    Opened(BacktestTrade),
}

fn step(
    bars: &[PriceBar],
    as_of: usize,
    eval: &Evaluation,
    equity: f64,
    config: &BacktestConfig,
) -> Result<StepOutcome, StepError> {
    let score = eval.score.value;
    if let Some(reason) = eval.signal.wait_reason() {
        return Ok(StepOutcome::Decided(StepDecision::Wait { reason }));
    }
    if score < config.score_threshold {
        return Ok(StepOutcome::Decided(StepDecision::BelowThreshold { score }));
    }

    let setup = eval.setup;
    let shares = position_size(equity, config.risk_fraction, setup.entry, setup.stop_loss);
    if shares == 0 {
        return Ok(StepOutcome::Decided(StepDecision::Unsized { score }));
    }

    let horizon_end = as_of + config.holding_bars;
    if horizon_end >= bars.len() {
        return Ok(StepOutcome::Decided(StepDecision::Unresolved { score }));
    }
    let horizon = &bars[as_of + 1..=horizon_end];
    let Some(fill) = fill_offset(horizon, setup.entry) else {
        return Ok(StepOutcome::Decided(StepDecision::NotFilled { score }));
    };
    let held = &horizon[fill..];
    let Some(resolution) = resolve_from_fill(held, &setup, config.tie_break) else {
        return Ok(StepOutcome::Decided(StepDecision::Unresolved { score }));
    };

    let pnl = (resolution.exit_price - setup.entry) * shares as f64;
    if !pnl.is_finite() {
        return Err(StepError::NonFinitePnl {
            entry: setup.entry,
            exit: resolution.exit_price,
            shares,
        });
    }

    Ok(StepOutcome::Opened(BacktestTrade {
        open_date: held[0].date,
        exit_date: held[resolution.exit_offset].date,
        signal_index: as_of,
        entry_price: setup.entry,
        stop_loss: setup.stop_loss,
        take_profit: setup.take_profit,
        exit_price: resolution.exit_price,
        share_count: shares,
        outcome: resolution.outcome,
        exit_reason: resolution.exit_reason,
        pnl,
        score_at_entry: score,
        risk_reward_at_entry: eval.risk_reward,
    }))
}

fn dataset_hash(bars: &[PriceBar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for b in bars {
        hasher.update(b.date.to_string().as_bytes());
        for v in [b.open, b.high, b.low, b.close, b.volume] {
            hasher.update(&v.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
