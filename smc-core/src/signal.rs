//! LONG / WAIT classification.
//!
//! Checked in order: the close must be in a long-term uptrend, then below
//! the window equilibrium (discount), then a gap or a sweep must exist.
//! A setup that passes all three but is not `stop < entry < target` is
//! reported as `InvalidSetup` rather than LONG.

use serde::{Deserialize, Serialize};

use crate::detectors::SmcLevels;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitReason {
    Downtrend,
    Premium,
    NoSetup,
    InvalidSetup,
}

impl WaitReason {
    pub fn label(&self) -> &'static str {
        match self {
            WaitReason::Downtrend => "Downtrend",
            WaitReason::Premium => "Premium",
            WaitReason::NoSetup => "No Setup",
            WaitReason::InvalidSetup => "Invalid Setup",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "signal", content = "reason")]
pub enum Signal {
    Long,
    Wait(WaitReason),
}

impl Signal {
    pub fn is_long(&self) -> bool {
        matches!(self, Signal::Long)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Signal::Long => "LONG",
            Signal::Wait(_) => "WAIT",
        }
    }

    pub fn wait_reason(&self) -> Option<WaitReason> {
        match self {
            Signal::Long => None,
            Signal::Wait(reason) => Some(*reason),
        }
    }
}

pub fn classify(trend_up: bool, last_close: f64, levels: &SmcLevels) -> Signal {
    if !trend_up {
        Signal::Wait(WaitReason::Downtrend)
    } else if last_close >= levels.equilibrium {
        Signal::Wait(WaitReason::Premium)
    } else if !levels.has_pattern() {
        Signal::Wait(WaitReason::NoSetup)
    } else if !levels.setup().is_valid() {
        Signal::Wait(WaitReason::InvalidSetup)
    } else {
        Signal::Long
    }
}
