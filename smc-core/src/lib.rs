//! SMC Core: smart-money pattern detection over daily OHLCV bars.
//!
//! This crate is pure computation over an already-materialised series:
//! - Domain types (bars, series, trade setups)
//! - Indicator library (SMA, RSI, ATR, relative volume, trend, performance)
//! - Swing, order-block, structure-break, sweep and fair-value-gap detectors
//! - Level analysis (liquidity, equilibrium, entry anchor, stop)
//! - Rule-based composite scoring and the LONG/WAIT classifier
//! - Multi-timeframe confirmation and market-regime assessment
//!
//! Nothing here performs I/O. Every function that looks at bars takes a
//! slice already cut at the as-of index.

pub mod config;
pub mod detectors;
pub mod domain;
pub mod error;
pub mod evaluate;
pub mod indicators;
pub mod mtf;
pub mod regime;
pub mod scoring;
pub mod signal;

pub use config::{StopRule, StrategyConfig};
pub use error::AnalysisError;
pub use evaluate::{evaluate, evaluate_with_rules, Evaluation, MarketContext};
pub use signal::{classify, Signal, WaitReason};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything handed across threads by the runner
    /// is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::TradeSetup>();
        require_sync::<domain::TradeSetup>();

        require_send::<StrategyConfig>();
        require_sync::<StrategyConfig>();
        require_send::<MarketContext>();
        require_sync::<MarketContext>();
        require_send::<Evaluation>();
        require_sync::<Evaluation>();

        require_send::<detectors::SmcLevels>();
        require_sync::<detectors::SmcLevels>();
        require_send::<detectors::OrderBlock>();
        require_sync::<detectors::OrderBlock>();
        require_send::<scoring::SignalScore>();
        require_sync::<scoring::SignalScore>();
    }

    /// Rules see only the prepared context, never a whole series.
    #[test]
    fn scoring_rule_trait_takes_context_only() {
        fn _check_trait_object_builds(
            rule: &dyn scoring::ScoringRule,
            ctx: &scoring::ScoringContext<'_>,
        ) -> Option<scoring::Contribution> {
            rule.evaluate(ctx)
        }
    }

    #[test]
    fn default_rules_have_distinct_names() {
        let rules = scoring::default_rules();
        let mut names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), rules.len());
    }
}
