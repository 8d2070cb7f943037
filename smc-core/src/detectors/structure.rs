//! Market-structure break (BOS) detection.
//!
//! Over the trailing window: the most recent swing low must be higher than
//! the one before it, and the latest close must clear the most recent swing
//! high.

use serde::{Deserialize, Serialize};

use super::swing::{find_swings, of_kind, SwingKind};
use super::trailing;
use crate::domain::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakClass {
    Bos,
    NoBos,
    InsufficientData,
}

impl BreakClass {
    pub fn label(&self) -> &'static str {
        match self {
            BreakClass::Bos => "BOS",
            BreakClass::NoBos => "No BOS",
            BreakClass::InsufficientData => "Insufficient Data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketStructureBreak {
    pub broke: bool,
    /// `(close - last_swing_high) / last_swing_high * 100` on a break, else 0.
    pub strength_pct: f64,
    pub classification: BreakClass,
}

impl MarketStructureBreak {
    pub fn insufficient() -> Self {
        Self {
            broke: false,
            strength_pct: 0.0,
            classification: BreakClass::InsufficientData,
        }
    }

    fn no_break() -> Self {
        Self {
            broke: false,
            strength_pct: 0.0,
            classification: BreakClass::NoBos,
        }
    }
}

pub fn detect_structure_break(bars: &[PriceBar], window: usize) -> MarketStructureBreak {
    if bars.len() < window || bars.is_empty() {
        return MarketStructureBreak::insufficient();
    }
    let recent = trailing(bars, window);
    let swings = find_swings(recent);

    let lows: Vec<f64> = of_kind(&swings, SwingKind::Low).map(|s| s.price).collect();
    let Some(last_high) = of_kind(&swings, SwingKind::High).last().map(|s| s.price) else {
        return MarketStructureBreak::insufficient();
    };
    if lows.len() < 2 {
        return MarketStructureBreak::insufficient();
    }

    let last_low = lows[lows.len() - 1];
    let prev_low = lows[lows.len() - 2];
    let close = recent[recent.len() - 1].close;

    if last_low > prev_low && close > last_high {
        MarketStructureBreak {
            broke: true,
            strength_pct: (close - last_high) / last_high * 100.0,
            classification: BreakClass::Bos,
        }
    } else {
        MarketStructureBreak::no_break()
    }
}
