//! Live scan: screen and evaluate many instruments at their last bar, rank
//! the results, and pick the alerts.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smc_core::domain::PriceSeries;
use smc_core::mtf::MtfConfirmation;
use smc_core::{evaluate, Evaluation, MarketContext};
use tracing::{debug, info};

use crate::config::ScanConfig;

/// One instrument to scan, with optional finer and coarser series for
/// multi-timeframe confirmation.
#[derive(Debug, Clone)]
pub struct ScanInstrument {
    pub series: PriceSeries,
    pub intraday: Option<PriceSeries>,
    pub weekly: Option<PriceSeries>,
}

impl ScanInstrument {
    pub fn daily(series: PriceSeries) -> Self {
        Self {
            series,
            intraday: None,
            weekly: None,
        }
    }

    fn mtf(&self) -> MtfConfirmation {
        MtfConfirmation::from_series(
            self.intraday.as_ref().map(|s| s.bars()),
            self.weekly.as_ref().map(|s| s.bars()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanPick {
    pub symbol: String,
    pub evaluation: Evaluation,
}

impl ScanPick {
    pub fn score(&self) -> u32 {
        self.evaluation.score.value
    }
}

/// Screen, evaluate and rank `instruments`.
///
/// `market_bonus` is the regime adjustment shared by every instrument.
/// Instruments that fail the universe filter or cannot be evaluated do not
/// appear in the output. The result is sorted by score, highest first; equal
/// scores keep input order.
pub fn scan_universe(
    instruments: &[ScanInstrument],
    benchmark: Option<&PriceSeries>,
    market_bonus: i32,
    config: &ScanConfig,
) -> Vec<ScanPick> {
    let mut picks: Vec<ScanPick> = instruments
        .par_iter()
        .filter_map(|inst| {
            let symbol = inst.series.symbol();
            let bars = inst.series.bars();
            if let Err(rejection) = config.universe.check(bars, benchmark.map(|b| b.bars())) {
                debug!("{symbol}: screened out: {rejection}");
                return None;
            }
            let market = MarketContext {
                market_bonus,
                mtf: inst.mtf(),
            };
            match evaluate(bars, &market, &config.strategy) {
                Ok(evaluation) => Some(ScanPick {
                    symbol: symbol.to_string(),
                    evaluation,
                }),
                Err(e) => {
                    debug!("{symbol}: not scored: {e}");
                    None
                }
            }
        })
        .collect();

    picks.sort_by(|a, b| b.score().cmp(&a.score()));
    info!("scan: {} of {} instruments scored", picks.len(), instruments.len());
    picks
}

/// The first `n` picks of a ranked list.
pub fn top_picks(ranked: &[ScanPick], n: usize) -> &[ScanPick] {
    &ranked[..n.min(ranked.len())]
}

/// LONG picks scoring at least `threshold`, at most `max` of them, in rank
/// order.
pub fn select_alerts(ranked: &[ScanPick], threshold: u32, max: usize) -> Vec<&ScanPick> {
    ranked
        .iter()
        .filter(|p| p.evaluation.signal.is_long() && p.score() >= threshold)
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::UniverseFilter;
    use chrono::NaiveDate;
    use smc_core::domain::PriceBar;
    use smc_core::{Signal, StrategyConfig, WaitReason};

    fn series(symbol: &str, n: usize, slope: f64) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let bars: Vec<PriceBar> = (0..n)
            .map(|i| {
                let close = 100.0 + slope * i as f64 + if i % 2 == 0 { 1.0 } else { -1.0 };
                PriceBar::new(
                    base + chrono::Duration::days(i as i64),
                    close,
                    close + 1.5,
                    close - 1.5,
                    close,
                    5_000_000.0,
                )
            })
            .collect();
        PriceSeries::from_bars(symbol, bars).0
    }

    fn pick(symbol: &str, score: u32, signal: Signal) -> ScanPick {
        let s = series(symbol, 60, 0.1);
        let mut evaluation = evaluate(s.bars(), &MarketContext::default(), &StrategyConfig::default())
            .unwrap();
        evaluation.score.value = score;
        evaluation.signal = signal;
        ScanPick {
            symbol: symbol.into(),
            evaluation,
        }
    }

    fn open_filter() -> ScanConfig {
        ScanConfig {
            universe: UniverseFilter {
                min_history: 1,
                trend_period: 0,
                min_dollar_volume: 0.0,
                min_beta: 0.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn scan_is_sorted_and_drops_screened() {
        let instruments = vec![
            ScanInstrument::daily(series("AAA", 120, 0.2)),
            ScanInstrument::daily(series("BBB", 120, -0.2)),
            ScanInstrument::daily(PriceSeries::from_bars("EMPTY", Vec::<PriceBar>::new()).0),
        ];
        let picks = scan_universe(&instruments, None, 0, &open_filter());
        assert_eq!(picks.len(), 2);
        for pair in picks.windows(2) {
            assert!(pair[0].score() >= pair[1].score());
        }
    }

    #[test]
    fn default_filter_rejects_short_history() {
        let instruments = vec![ScanInstrument::daily(series("AAA", 120, 0.2))];
        let picks = scan_universe(&instruments, None, 0, &ScanConfig::default());
        assert!(picks.is_empty());
    }

    #[test]
    fn top_picks_caps_length() {
        let ranked = vec![
            pick("A", 90, Signal::Long),
            pick("B", 80, Signal::Long),
        ];
        assert_eq!(top_picks(&ranked, 5).len(), 2);
        assert_eq!(top_picks(&ranked, 1)[0].symbol, "A");
        assert!(top_picks(&[], 5).is_empty());
    }

    #[test]
    fn alerts_need_long_and_threshold() {
        let ranked = vec![
            pick("A", 120, Signal::Wait(WaitReason::Premium)),
            pick("B", 95, Signal::Long),
            pick("C", 90, Signal::Long),
            pick("D", 85, Signal::Long),
            pick("E", 82, Signal::Long),
            pick("F", 79, Signal::Long),
        ];
        let alerts: Vec<&str> = select_alerts(&ranked, 80, 3)
            .iter()
            .map(|p| p.symbol.as_str())
            .collect();
        assert_eq!(alerts, vec!["B", "C", "D"]);
        assert!(select_alerts(&ranked, 100, 3).is_empty());
    }
}
