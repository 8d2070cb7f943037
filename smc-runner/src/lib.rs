//! SMC Runner: walk-forward backtests, batch runs, live scans, exports.
//!
//! This crate builds on `smc-core` to provide:
//! - TOML configuration for backtests and scans
//! - Walk-forward simulator with fixed-fractional sizing, limit entries and
//!   per-date market context
//! - Backtest statistics and cross-instrument aggregate reports
//! - Universe screening, parallel scans, top picks and alert selection
//! - An in-memory daily pick journal
//! - CSV ingestion of bars and JSON/CSV export of results

pub mod batch;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod journal;
pub mod market;
pub mod metrics;
pub mod scan;
pub mod simulator;
pub mod universe;

pub use batch::{run_batch, AggregateReport, InstrumentSummary};
pub use config::{BacktestConfig, ConfigError, RunId, ScanConfig, TieBreak};
pub use data_loader::{load_csv, load_csv_file, LoadError, LoadedSeries};
pub use journal::{InMemoryJournal, JournalPick, PickJournal};
pub use market::MarketHistory;
pub use metrics::BacktestStats;
pub use scan::{scan_universe, select_alerts, top_picks, ScanInstrument, ScanPick};
pub use simulator::{
    fill_offset, position_size, resolve_trade, run_walk_forward, BacktestResult, BacktestTrade,
    ExitReason, StepDecision, StepError, TradeOutcome, WalkStep,
};
pub use universe::{beta, Rejection, UniverseFilter};
