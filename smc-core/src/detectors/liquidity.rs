//! Liquidity-sweep detection.
//!
//! Reference lows come from the bars *before* the scan window so that a
//! scanned bar is never part of the level it sweeps. The scan walks the last
//! few bars oldest first:
//! - low below the 20-bar reference and close back above it: MAJOR, stop;
//! - else low below the 10-bar reference and close back above it: MINOR;
//! - else a wick through the latest swing low with a long lower wick and
//!   above-average volume: MINOR, only if nothing was found yet.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

const SHORT_REFERENCE: usize = 10;
const LONG_REFERENCE: usize = 20;
const WICK_TO_BODY: f64 = 1.2;
const VOLUME_CONFIRM: f64 = 1.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SweepKind {
    #[default]
    None,
    Minor,
    Major,
}

impl SweepKind {
    pub fn label(&self) -> &'static str {
        match self {
            SweepKind::None => "NONE",
            SweepKind::Minor => "MINOR",
            SweepKind::Major => "MAJOR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LiquiditySweep {
    pub kind: SweepKind,
    /// The low that was swept.
    pub reference_level: Option<f64>,
    /// Index of the sweeping bar within the scanned slice.
    pub trigger_index: Option<usize>,
    pub trigger_low: Option<f64>,
}

impl LiquiditySweep {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_found(&self) -> bool {
        self.kind != SweepKind::None
    }

    /// Entry anchor just above the swept level.
    pub fn entry_anchor(&self, factor: f64) -> Option<f64> {
        self.reference_level.map(|level| level * factor)
    }

    fn hit(kind: SweepKind, level: f64, index: usize, bar: &PriceBar) -> Self {
        Self {
            kind,
            reference_level: Some(level),
            trigger_index: Some(index),
            trigger_low: Some(bar.low),
        }
    }
}

/// Scan the last `scan_bars` bars of `window` for a sweep.
///
/// `swing_low` is the most recent swing low of the window, used by the
/// wick-through rule.
pub fn detect_sweep(window: &[PriceBar], swing_low: Option<f64>, scan_bars: usize) -> LiquiditySweep {
    let n = window.len();
    if n == 0 || scan_bars == 0 {
        return LiquiditySweep::none();
    }
    let scan_start = n - scan_bars.min(n);
    let prior = &window[..scan_start];

    let window_low = min_low(window);
    let reference = |len: usize| {
        if prior.len() >= len {
            min_low(&prior[prior.len() - len..])
        } else {
            window_low
        }
    };
    let low_10 = reference(SHORT_REFERENCE);
    let low_20 = reference(LONG_REFERENCE);
    let mean_volume = window.iter().map(|b| b.volume).sum::<f64>() / n as f64;

    let mut found = LiquiditySweep::none();
    for (index, bar) in window.iter().enumerate().skip(scan_start) {
        if bar.low < low_20 && bar.close > low_20 {
            return LiquiditySweep::hit(SweepKind::Major, low_20, index, bar);
        }
        if bar.low < low_10 && bar.close > low_10 {
            found = LiquiditySweep::hit(SweepKind::Minor, low_10, index, bar);
            continue;
        }
        if let Some(level) = swing_low {
            let wicked = bar.low < level
                && bar.close > level
                && bar.lower_wick() > bar.body() * WICK_TO_BODY
                && bar.volume > mean_volume * VOLUME_CONFIRM;
            if wicked && !found.is_found() {
                found = LiquiditySweep::hit(SweepKind::Minor, level, index, bar);
            }
        }
    }
    found
}

fn min_low(bars: &[PriceBar]) -> f64 {
    bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min)
}
