//! Export of backtest and scan results: JSON and CSV.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: trade log, equity curve and ranked scan picks
//!
//! Persisted results carry a `schema_version`; newer versions are rejected on
//! load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::scan::ScanPick;
use crate::simulator::{BacktestResult, BacktestTrade, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a `BacktestResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    let result: BacktestResult =
        serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: open_date, exit_date, signal_index, entry, stop, target, exit,
/// shares, outcome, exit_reason, pnl, score, risk_reward
pub fn export_trades_csv(trades: &[BacktestTrade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "open_date",
        "exit_date",
        "signal_index",
        "entry",
        "stop",
        "target",
        "exit",
        "shares",
        "outcome",
        "exit_reason",
        "pnl",
        "score",
        "risk_reward",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.open_date.to_string(),
            &t.exit_date.to_string(),
            &t.signal_index.to_string(),
            &format!("{:.4}", t.entry_price),
            &format!("{:.4}", t.stop_loss),
            &format!("{:.4}", t.take_profit),
            &format!("{:.4}", t.exit_price),
            &t.share_count.to_string(),
            t.outcome.label(),
            t.exit_reason.label(),
            &format!("{:.2}", t.pnl),
            &t.score_at_entry.to_string(),
            &format!("{:.2}", t.risk_reward_at_entry),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export an equity curve as CSV with trade_index and equity columns.
///
/// Row 0 is the starting equity.
pub fn export_equity_csv(equity_curve: &[f64]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["trade_index", "equity"])?;
    for (i, eq) in equity_curve.iter().enumerate() {
        wtr.write_record([&i.to_string(), &format!("{:.2}", eq)])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Ranked scan picks: rank, symbol, signal, score, entry, stop, target,
/// risk_reward, reasons (`; `-joined).
pub fn export_picks_csv(picks: &[ScanPick]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "rank",
        "symbol",
        "signal",
        "score",
        "entry",
        "stop",
        "target",
        "risk_reward",
        "reasons",
    ])?;
    for (i, p) in picks.iter().enumerate() {
        let e = &p.evaluation;
        wtr.write_record([
            &(i + 1).to_string(),
            &p.symbol,
            e.signal.label(),
            &e.score.value.to_string(),
            &format!("{:.4}", e.setup.entry),
            &format!("{:.4}", e.setup.stop_loss),
            &format!("{:.4}", e.setup.take_profit),
            &format!("{:.2}", e.risk_reward),
            &e.score.reasons.join("; "),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one backtest.
///
/// Creates `{symbol}_{run_id prefix}/` under `output_dir` containing
/// `result.json`, `trades.csv` and `equity.csv`. Returns the directory.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    let prefix: String = result.run_id.chars().take(12).collect();
    let run_dir = output_dir.join(format!("{}_{}", result.symbol, prefix));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("result.json"), export_json(result)?)?;
    std::fs::write(run_dir.join("trades.csv"), export_trades_csv(&result.trades)?)?;
    std::fs::write(
        run_dir.join("equity.csv"),
        export_equity_csv(&result.equity_curve)?,
    )?;
    Ok(run_dir)
}
