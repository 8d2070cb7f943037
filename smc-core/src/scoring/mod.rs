//! Composite scoring engine.
//!
//! A score is the base value plus the contributions of an ordered list of
//! independent rules. Each rule looks at the shared [`ScoringContext`] and
//! returns a delta, optional reason strings and whether the condition counts
//! as a confluence. After the rules run, a confluence bonus is added, the
//! total is floored at 0 and, if configured, capped.

pub mod rules;

use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::detectors::{MarketStructureBreak, OrderBlock, SweepKind};
use crate::domain::{PriceBar, TradeSetup};
use crate::indicators::IndicatorSnapshot;
use crate::mtf::MtfConfirmation;

pub use rules::{
    EntryProximity, GoldenCross, LongTermTrend, MarketRegimeAdjustment, OrderBlockProximity,
    RiskReward, RsiZone, StructureBreak, SweepConfirmation, TimeframeAlignment, VolumeSurge,
};

const CONFLUENCE_STRONG: u32 = 4;
const CONFLUENCE_STRONG_BONUS: i64 = 15;
const CONFLUENCE_MODERATE: u32 = 3;
const CONFLUENCE_MODERATE_BONUS: i64 = 8;

/// Everything a rule may look at. Detectors have already run.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub bars: &'a [PriceBar],
    pub setup: TradeSetup,
    pub order_blocks: &'a [OrderBlock],
    pub structure: &'a MarketStructureBreak,
    pub mtf: &'a MtfConfirmation,
    pub sweep: SweepKind,
    pub indicators: &'a IndicatorSnapshot,
    /// Market-regime adjustment, added as-is.
    pub market_bonus: i32,
}

impl ScoringContext<'_> {
    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }
}

/// One rule's effect on the score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub delta: i32,
    pub reasons: Vec<String>,
    pub confluence: bool,
}

impl Contribution {
    pub fn new(delta: i32, reason: impl Into<String>) -> Self {
        Self {
            delta,
            reasons: vec![reason.into()],
            confluence: false,
        }
    }

    /// A delta with no reason line.
    pub fn silent(delta: i32) -> Self {
        Self {
            delta,
            reasons: Vec::new(),
            confluence: false,
        }
    }

    pub fn confluent(mut self) -> Self {
        self.confluence = true;
        self
    }
}

/// A named, independent scoring rule.
pub trait ScoringRule: Send + Sync {
    fn name(&self) -> &str;

    /// `None` when the rule's condition is absent.
    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Contribution>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalScore {
    pub value: u32,
    pub reasons: Vec<String>,
    pub confluence_count: u32,
}

/// The standard pipeline, in application order.
pub fn default_rules() -> Vec<Box<dyn ScoringRule>> {
    vec![
        Box::new(OrderBlockProximity),
        Box::new(StructureBreak),
        Box::new(TimeframeAlignment),
        Box::new(VolumeSurge),
        Box::new(SweepConfirmation),
        Box::new(RiskReward),
        Box::new(RsiZone),
        Box::new(EntryProximity),
        Box::new(LongTermTrend),
        Box::new(GoldenCross),
        Box::new(MarketRegimeAdjustment),
    ]
}

pub fn score_setup(
    ctx: &ScoringContext<'_>,
    rules: &[Box<dyn ScoringRule>],
    config: &StrategyConfig,
) -> SignalScore {
    let mut total = i64::from(config.score_base);
    let mut reasons = Vec::new();
    let mut confluence_count = 0u32;

    for rule in rules {
        if let Some(c) = rule.evaluate(ctx) {
            total += i64::from(c.delta);
            reasons.extend(c.reasons);
            if c.confluence {
                confluence_count += 1;
            }
        }
    }

    if confluence_count >= CONFLUENCE_STRONG {
        total += CONFLUENCE_STRONG_BONUS;
        reasons.push(format!("{confluence_count}x confluences"));
    } else if confluence_count >= CONFLUENCE_MODERATE {
        total += CONFLUENCE_MODERATE_BONUS;
    }

    let mut value = u32::try_from(total.max(0)).unwrap_or(u32::MAX);
    if let Some(ceiling) = config.score_ceiling {
        value = value.min(ceiling);
    }

    SignalScore {
        value,
        reasons,
        confluence_count,
    }
}
