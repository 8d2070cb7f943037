//! The standard scoring rules.
//!
//! Magnitudes are fixed constants; each rule is independent of the others.

use super::{Contribution, ScoringContext, ScoringRule};
use crate::detectors::SweepKind;

/// Order block whose top sits within 1.5% of the entry:
/// `+round(25 * strength)`, confluence.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderBlockProximity;

const OB_MAX_DISTANCE: f64 = 0.015;
const OB_WEIGHT: f64 = 25.0;

impl ScoringRule for OrderBlockProximity {
    fn name(&self) -> &str {
        "order_block_proximity"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Contribution> {
        let entry = ctx.setup.entry;
        if entry <= 0.0 {
            return None;
        }
        let closest = ctx.order_blocks.iter().min_by(|a, b| {
            (entry - a.zone_high)
                .abs()
                .total_cmp(&(entry - b.zone_high).abs())
        })?;
        let distance = (entry - closest.zone_high).abs() / entry;
        if distance >= OB_MAX_DISTANCE {
            return None;
        }
        let bonus = (OB_WEIGHT * closest.strength).round() as i32;
        Some(
            Contribution::new(bonus, format!("Strong order block ({:.2}x)", closest.strength))
                .confluent(),
        )
    }
}

/// Break of structure: +20, confluence.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureBreak;

impl ScoringRule for StructureBreak {
    fn name(&self) -> &str {
        "structure_break"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Contribution> {
        ctx.structure.broke.then(|| {
            Contribution::new(
                20,
                format!(
                    "{} (+{:.1}%)",
                    ctx.structure.classification.label(),
                    ctx.structure.strength_pct
                ),
            )
            .confluent()
        })
    }
}

/// Higher/lower timeframe agreement: its own sub-score, confluence.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeframeAlignment;

impl ScoringRule for TimeframeAlignment {
    fn name(&self) -> &str {
        "timeframe_alignment"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Contribution> {
        ctx.mtf.confirmed().then(|| Contribution {
            delta: ctx.mtf.score,
            reasons: ctx.mtf.reasons.clone(),
            confluence: true,
        })
    }
}

/// Relative volume tiers: >2.5 → +20, >1.8 → +15 (both confluent), >1.3 → +8.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeSurge;

impl ScoringRule for VolumeSurge {
    fn name(&self) -> &str {
        "volume_surge"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Contribution> {
        let rvol = ctx.indicators.relative_volume;
        if rvol > 2.5 {
            Some(Contribution::new(20, format!("Huge volume ({rvol:.1}x)")).confluent())
        } else if rvol > 1.8 {
            Some(Contribution::new(15, format!("Strong volume ({rvol:.1}x)")).confluent())
        } else if rvol > 1.3 {
            Some(Contribution::new(8, format!("Volume up ({rvol:.1}x)")))
        } else {
            None
        }
    }
}

/// MAJOR sweep: +25, confluence. MINOR: +15.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepConfirmation;

impl ScoringRule for SweepConfirmation {
    fn name(&self) -> &str {
        "sweep_confirmation"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Contribution> {
        match ctx.sweep {
            SweepKind::Major => {
                Some(Contribution::new(25, "Major sweep of the 20-bar low").confluent())
            }
            SweepKind::Minor => Some(Contribution::new(15, "Minor sweep")),
            SweepKind::None => None,
        }
    }
}

/// Reward over risk: ≥4 → +20 (confluent), ≥3 → +15, ≥2.5 → +10,
/// ≥2 → +5, below 2 → -15.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskReward;

impl ScoringRule for RiskReward {
    fn name(&self) -> &str {
        "risk_reward"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Contribution> {
        let rr = ctx.setup.risk_reward();
        Some(if rr >= 4.0 {
            Contribution::new(20, format!("Exceptional R:R ({rr:.1})")).confluent()
        } else if rr >= 3.0 {
            Contribution::new(15, format!("Great R:R ({rr:.1})"))
        } else if rr >= 2.5 {
            Contribution::new(10, format!("Good R:R ({rr:.1})"))
        } else if rr >= 2.0 {
            Contribution::silent(5)
        } else {
            Contribution::new(-15, format!("Low R:R ({rr:.1})"))
        })
    }
}

/// RSI zones checked in order: 35-45 → +18 (confluent), 40-55 → +10,
/// <30 → +5, >70 → -20, >65 → -10. Undefined RSI reads as 50.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsiZone;

impl ScoringRule for RsiZone {
    fn name(&self) -> &str {
        "rsi_zone"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Contribution> {
        let rsi = ctx.indicators.rsi.unwrap_or(50.0);
        if (35.0..=45.0).contains(&rsi) {
            Some(Contribution::new(18, format!("Golden RSI ({})", rsi as i32)).confluent())
        } else if (40.0..=55.0).contains(&rsi) {
            Some(Contribution::new(10, format!("RSI pullback ({})", rsi as i32)))
        } else if rsi < 30.0 {
            Some(Contribution::silent(5))
        } else if rsi > 70.0 {
            Some(Contribution::silent(-20))
        } else if rsi > 65.0 {
            Some(Contribution::silent(-10))
        } else {
            None
        }
    }
}

/// Distance from the last close to the entry: <0.8% → +18, <1% → +15,
/// <2% → +8, >5% → -12.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryProximity;

impl ScoringRule for EntryProximity {
    fn name(&self) -> &str {
        "entry_proximity"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Contribution> {
        let entry = ctx.setup.entry;
        let close = ctx.last_close()?;
        if entry <= 0.0 {
            return None;
        }
        let dist = (close - entry).abs() / entry;
        if dist < 0.008 {
            Some(Contribution::new(18, "Sniper entry"))
        } else if dist < 0.01 {
            Some(Contribution::new(15, "In the buy zone"))
        } else if dist < 0.02 {
            Some(Contribution::silent(8))
        } else if dist > 0.05 {
            Some(Contribution::new(
                -12,
                format!("Price chasing ({:.1}%)", dist * 100.0),
            ))
        } else {
            None
        }
    }
}

/// Close above the long-term average: +5.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongTermTrend;

impl ScoringRule for LongTermTrend {
    fn name(&self) -> &str {
        "long_term_trend"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Contribution> {
        ctx.indicators
            .trend_up
            .then(|| Contribution::new(5, "Long-term uptrend"))
    }
}

/// Fresh golden cross: +10, confluence.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoldenCross;

impl ScoringRule for GoldenCross {
    fn name(&self) -> &str {
        "golden_cross"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Contribution> {
        ctx.indicators
            .golden_cross
            .then(|| Contribution::new(10, "Golden cross").confluent())
    }
}

/// The market-regime bonus, unweighted.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketRegimeAdjustment;

impl ScoringRule for MarketRegimeAdjustment {
    fn name(&self) -> &str {
        "market_regime"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<Contribution> {
        let bonus = ctx.market_bonus;
        match bonus.signum() {
            1 => Some(Contribution::new(bonus, format!("Market tailwind (+{bonus})"))),
            -1 => Some(Contribution::new(bonus, format!("Market headwind ({bonus})"))),
            _ => None,
        }
    }
}
