//! Universe screening filters applied before an instrument is evaluated.
//!
//! An instrument is kept when it has enough history, closes above its long
//! moving average, trades enough dollar volume, and moves at least as much as
//! the benchmark (beta).

use serde::{Deserialize, Serialize};
use smc_core::domain::PriceBar;
use smc_core::indicators::sma_at;
use thiserror::Error;

/// Why an instrument failed the screen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("only {available} bars (need {required})")]
    ShortHistory { required: usize, available: usize },

    #[error("close {close:.2} below SMA{period} {sma:.2}")]
    BelowTrend { close: f64, sma: f64, period: usize },

    #[error("average dollar volume {average:.0} below {minimum:.0}")]
    Illiquid { average: f64, minimum: f64 },

    #[error("beta {beta:.2} below {minimum:.2}")]
    LowBeta { beta: f64, minimum: f64 },
}

/// Screening thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseFilter {
    pub min_history: usize,
    /// Long moving average the close must sit above. `0` disables the check.
    pub trend_period: usize,
    pub dollar_volume_window: usize,
    pub min_dollar_volume: f64,
    pub min_beta: f64,
}

impl Default for UniverseFilter {
    fn default() -> Self {
        Self {
            min_history: 200,
            trend_period: 200,
            dollar_volume_window: 30,
            min_dollar_volume: 500_000_000.0,
            min_beta: 0.8,
        }
    }
}

impl UniverseFilter {
    /// Run every check in order and report the first failure.
    ///
    /// The beta check needs a benchmark; without one it is skipped.
    pub fn check(&self, bars: &[PriceBar], benchmark: Option<&[PriceBar]>) -> Result<(), Rejection> {
        if bars.len() < self.min_history || bars.is_empty() {
            return Err(Rejection::ShortHistory {
                required: self.min_history.max(1),
                available: bars.len(),
            });
        }
        let last = bars.len() - 1;
        let close = bars[last].close;

        if self.trend_period > 0 {
            match sma_at(bars, self.trend_period, last) {
                Some(sma) if close >= sma => {}
                Some(sma) => {
                    return Err(Rejection::BelowTrend {
                        close,
                        sma,
                        period: self.trend_period,
                    })
                }
                None => {
                    return Err(Rejection::ShortHistory {
                        required: self.trend_period,
                        available: bars.len(),
                    })
                }
            }
        }

        let average = average_dollar_volume(bars, self.dollar_volume_window);
        if average < self.min_dollar_volume {
            return Err(Rejection::Illiquid {
                average,
                minimum: self.min_dollar_volume,
            });
        }

        if let Some(bench) = benchmark {
            let b = beta(bars, bench);
            if b < self.min_beta {
                return Err(Rejection::LowBeta {
                    beta: b,
                    minimum: self.min_beta,
                });
            }
        }
        Ok(())
    }

    pub fn passes(&self, bars: &[PriceBar], benchmark: Option<&[PriceBar]>) -> bool {
        self.check(bars, benchmark).is_ok()
    }
}

/// Mean of `close * volume` over the last `window` bars (fewer if the series
/// is shorter). Zero for an empty series.
pub fn average_dollar_volume(bars: &[PriceBar], window: usize) -> f64 {
    let start = bars.len().saturating_sub(window.max(1));
    let tail = &bars[start..];
    if tail.is_empty() {
        return 0.0;
    }
    tail.iter().map(|b| b.close * b.volume).sum::<f64>() / tail.len() as f64
}

fn daily_returns(bars: &[PriceBar]) -> Vec<f64> {
    bars.windows(2)
        .map(|w| {
            if w[0].close > 0.0 {
                w[1].close / w[0].close - 1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Beta of `asset` against `benchmark` from close-to-close returns.
///
/// Both return series are aligned on their tails (most recent bars). Uses
/// population covariance over population variance. Returns 0.0 with fewer
/// than two aligned returns or a flat benchmark.
pub fn beta(asset: &[PriceBar], benchmark: &[PriceBar]) -> f64 {
    let ra = daily_returns(asset);
    let rb = daily_returns(benchmark);
    let n = ra.len().min(rb.len());
    if n < 2 {
        return 0.0;
    }
    let ra = &ra[ra.len() - n..];
    let rb = &rb[rb.len() - n..];

    let mean_a = ra.iter().sum::<f64>() / n as f64;
    let mean_b = rb.iter().sum::<f64>() / n as f64;
    let cov = ra
        .iter()
        .zip(rb)
        .map(|(a, b)| (a - mean_a) * (b - mean_b))
        .sum::<f64>()
        / n as f64;
    let var = rb.iter().map(|b| (b - mean_b).powi(2)).sum::<f64>() / n as f64;

    if var <= f64::EPSILON {
        return 0.0;
    }
    let b = cov / var;
    if b.is_finite() {
        b
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(closes: &[f64], volume: f64) -> Vec<PriceBar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                PriceBar::new(
                    base + chrono::Duration::days(i as i64),
                    c,
                    c + 1.0,
                    c - 1.0,
                    c,
                    volume,
                )
            })
            .collect()
    }

    fn zigzag(n: usize, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let wave = if i % 2 == 0 { amplitude } else { -amplitude };
                100.0 + i as f64 * 0.2 + wave
            })
            .collect()
    }

    #[test]
    fn beta_of_identical_series_is_one() {
        let bars = series(&zigzag(60, 2.0), 1.0);
        assert!((beta(&bars, &bars) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn beta_flat_benchmark_is_zero() {
        let asset = series(&zigzag(60, 2.0), 1.0);
        let flat = series(&[100.0; 60], 1.0);
        assert_eq!(beta(&asset, &flat), 0.0);
    }

    #[test]
    fn beta_needs_two_returns() {
        let asset = series(&[100.0, 101.0], 1.0);
        let bench = series(&[100.0, 102.0], 1.0);
        assert_eq!(beta(&asset, &bench), 0.0);
    }

    #[test]
    fn beta_aligns_on_tail() {
        let bench = series(&zigzag(80, 2.0), 1.0);
        // Asset is the benchmark's last 40 bars: perfect co-movement.
        let asset = bench[40..].to_vec();
        assert!((beta(&asset, &bench) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn liquid_uptrend_passes() {
        let closes: Vec<f64> = (0..220).map(|i| 100.0 + i as f64 * 0.5).collect();
        let bars = series(&closes, 10_000_000.0);
        let filter = UniverseFilter::default();
        assert_eq!(filter.check(&bars, None), Ok(()));
        assert!(filter.passes(&bars, Some(&bars)));
    }

    #[test]
    fn short_history_rejected() {
        let bars = series(&[100.0; 150], 10_000_000.0);
        assert!(matches!(
            UniverseFilter::default().check(&bars, None),
            Err(Rejection::ShortHistory { required: 200, available: 150 })
        ));
    }

    #[test]
    fn downtrend_rejected() {
        let closes: Vec<f64> = (0..220).map(|i| 300.0 - i as f64 * 0.5).collect();
        let bars = series(&closes, 10_000_000.0);
        assert!(matches!(
            UniverseFilter::default().check(&bars, None),
            Err(Rejection::BelowTrend { .. })
        ));
    }

    #[test]
    fn thin_volume_rejected() {
        let closes: Vec<f64> = (0..220).map(|i| 100.0 + i as f64 * 0.5).collect();
        let bars = series(&closes, 1_000.0);
        assert!(matches!(
            UniverseFilter::default().check(&bars, None),
            Err(Rejection::Illiquid { .. })
        ));
    }

    #[test]
    fn low_beta_rejected() {
        let closes: Vec<f64> = (0..220).map(|i| 100.0 + i as f64 * 0.5).collect();
        let asset = series(&closes, 10_000_000.0);
        let bench = series(&zigzag(220, 3.0), 1.0);
        assert!(matches!(
            UniverseFilter::default().check(&asset, Some(&bench)),
            Err(Rejection::LowBeta { .. })
        ));
    }

    #[test]
    fn average_dollar_volume_uses_tail() {
        let mut bars = series(&[10.0; 40], 1.0);
        for b in bars.iter_mut().skip(10) {
            b.volume = 100.0;
        }
        assert_eq!(average_dollar_volume(&bars, 30), 1_000.0);
        assert_eq!(average_dollar_volume(&[], 30), 0.0);
    }
}
