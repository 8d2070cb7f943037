//! TradeSetup: proposed entry, stop and target for a long position.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl TradeSetup {
    pub fn new(entry: f64, stop_loss: f64, take_profit: f64) -> Self {
        Self {
            entry,
            stop_loss,
            take_profit,
        }
    }

    /// `stop_loss < entry < take_profit`, all finite.
    pub fn is_valid(&self) -> bool {
        self.entry.is_finite()
            && self.stop_loss.is_finite()
            && self.take_profit.is_finite()
            && self.stop_loss < self.entry
            && self.entry < self.take_profit
    }

    /// Risk per share; not positive for an inverted setup.
    pub fn risk(&self) -> f64 {
        self.entry - self.stop_loss
    }

    /// `(target - entry) / (entry - stop)`, 0 when the risk is not positive.
    pub fn risk_reward(&self) -> f64 {
        let risk = self.risk();
        if risk > 0.0 {
            (self.take_profit - self.entry) / risk
        } else {
            0.0
        }
    }
}
