//! One full evaluation of an as-of slice: indicators, detectors, scoring,
//! classification.

use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::detectors::{
    analyze_levels, detect_structure_break, find_order_blocks, MarketStructureBreak, OrderBlock,
    SmcLevels,
};
use crate::domain::{PriceBar, TradeSetup};
use crate::error::AnalysisError;
use crate::indicators::IndicatorSnapshot;
use crate::mtf::MtfConfirmation;
use crate::scoring::{default_rules, score_setup, ScoringContext, ScoringRule, SignalScore};
use crate::signal::{classify, Signal};

/// Outside context for an evaluation.
#[derive(Debug, Clone, Default)]
pub struct MarketContext {
    /// Market-regime adjustment (+5 / 0 / -10).
    pub market_bonus: i32,
    pub mtf: MtfConfirmation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub signal: Signal,
    pub setup: TradeSetup,
    pub score: SignalScore,
    pub risk_reward: f64,
    /// Pattern families present: sweep, BOS, multi-timeframe, golden cross.
    pub strategy_count: u32,
    pub last_close: f64,
    pub levels: SmcLevels,
    pub indicators: IndicatorSnapshot,
    pub structure: MarketStructureBreak,
    pub order_blocks: Vec<OrderBlock>,
}

/// Evaluate the last bar of `bars` with the standard rule list.
///
/// `bars` must already be cut at the as-of index; nothing past its end is
/// consulted.
pub fn evaluate(
    bars: &[PriceBar],
    market: &MarketContext,
    config: &StrategyConfig,
) -> Result<Evaluation, AnalysisError> {
    evaluate_with_rules(bars, market, config, &default_rules())
}

pub fn evaluate_with_rules(
    bars: &[PriceBar],
    market: &MarketContext,
    config: &StrategyConfig,
    rules: &[Box<dyn ScoringRule>],
) -> Result<Evaluation, AnalysisError> {
    let last_close = bars
        .last()
        .map(|b| b.close)
        .ok_or(AnalysisError::InsufficientData {
            required: 1,
            available: 0,
        })?;

    let indicators = IndicatorSnapshot::compute(bars, config);
    let levels = analyze_levels(bars, config);
    let setup = levels.setup();
    if !(setup.entry.is_finite() && setup.stop_loss.is_finite() && setup.take_profit.is_finite()) {
        return Err(AnalysisError::degenerate(format!(
            "non-finite levels: entry={}, stop={}, target={}",
            setup.entry, setup.stop_loss, setup.take_profit
        )));
    }

    let order_blocks = find_order_blocks(bars, config.order_block_lookback, config.order_block_keep);
    let structure = detect_structure_break(bars, config.window);

    let ctx = ScoringContext {
        bars,
        setup,
        order_blocks: &order_blocks,
        structure: &structure,
        mtf: &market.mtf,
        sweep: levels.sweep.kind,
        indicators: &indicators,
        market_bonus: market.market_bonus,
    };
    let score = score_setup(&ctx, rules, config);
    let signal = classify(indicators.trend_up, last_close, &levels);

    let strategy_count = [
        levels.sweep.is_found(),
        structure.broke,
        market.mtf.confirmed(),
        indicators.golden_cross,
    ]
    .iter()
    .filter(|&&present| present)
    .count() as u32;

    Ok(Evaluation {
        signal,
        setup,
        score,
        risk_reward: setup.risk_reward(),
        strategy_count,
        last_close,
        levels,
        indicators,
        structure,
        order_blocks,
    })
}
