//! Serializable backtest and scan configuration.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use smc_core::StrategyConfig;
use thiserror::Error;

use crate::universe::UniverseFilter;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which level wins when stop and target are both touched on the same bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    StopFirst,
    TargetFirst,
}

/// Parameters of one walk-forward backtest.
///
/// Every field is optional in TOML; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub starting_equity: f64,
    /// Fraction of current equity put at risk per trade.
    pub risk_fraction: f64,
    /// Bars between consecutive as-of indices.
    pub stride: usize,
    /// First as-of index evaluated.
    pub warmup_bars: usize,
    /// Series shorter than this produce no result.
    pub min_history: usize,
    /// Minimum score for a LONG signal to open a trade.
    pub score_threshold: u32,
    /// Bars scanned after the as-of index to resolve a trade.
    pub holding_bars: usize,
    pub tie_break: TieBreak,
    pub strategy: StrategyConfig,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            starting_equity: 10_000.0,
            risk_fraction: 0.01,
            stride: 10,
            warmup_bars: 60,
            min_history: 100,
            score_threshold: 75,
            holding_bars: 5,
            tie_break: TieBreak::StopFirst,
            strategy: StrategyConfig::default(),
        }
    }
}

impl BacktestConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = read_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.starting_equity.is_finite() && self.starting_equity > 0.0) {
            return Err(invalid(format!(
                "starting_equity must be positive, got {}",
                self.starting_equity
            )));
        }
        if !(self.risk_fraction > 0.0 && self.risk_fraction <= 1.0) {
            return Err(invalid(format!(
                "risk_fraction must be in (0, 1], got {}",
                self.risk_fraction
            )));
        }
        if self.stride == 0 {
            return Err(invalid("stride must be at least 1".into()));
        }
        if self.holding_bars == 0 {
            return Err(invalid("holding_bars must be at least 1".into()));
        }
        self.strategy.validate().map_err(ConfigError::Invalid)
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share the same RunId.
    pub fn run_id(&self) -> RunId {
        content_hash(self)
    }
}

/// Parameters of a live scan across many instruments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Picks kept after sorting by score.
    pub top_picks: usize,
    /// Minimum score for an alert.
    pub alert_threshold: u32,
    pub max_alerts: usize,
    pub strategy: StrategyConfig,
    pub universe: UniverseFilter,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            top_picks: 5,
            alert_threshold: 80,
            max_alerts: 3,
            strategy: StrategyConfig::default(),
            universe: UniverseFilter::default(),
        }
    }
}

impl ScanConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = read_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_picks == 0 {
            return Err(invalid("top_picks must be at least 1".into()));
        }
        if !(self.universe.min_dollar_volume >= 0.0 && self.universe.min_beta.is_finite()) {
            return Err(invalid("universe thresholds must be finite and non-negative".into()));
        }
        self.strategy.validate().map_err(ConfigError::Invalid)
    }

    pub fn run_id(&self) -> RunId {
        content_hash(self)
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

fn content_hash<T: Serialize>(value: &T) -> RunId {
    // Plain structs of numbers and enums always serialize.
    let json = serde_json::to_string(value).unwrap_or_default();
    blake3::hash(json.as_bytes()).to_hex().to_string()
}
