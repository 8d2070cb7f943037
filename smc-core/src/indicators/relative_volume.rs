//! Relative volume (RVOL).
//!
//! volume[t] / mean(volume[t-window..t]); the current bar is excluded from
//! its own baseline. NaN during warmup and when the baseline mean is zero.

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct RelativeVolume {
    window: usize,
    name: String,
}

impl RelativeVolume {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "RVOL window must be >= 1");
        Self {
            window,
            name: format!("rvol_{window}"),
        }
    }
}

impl Indicator for RelativeVolume {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        if n <= self.window {
            return result;
        }

        let mut sum: f64 = bars[..self.window].iter().map(|b| b.volume).sum();
        for i in self.window..n {
            let mean = sum / self.window as f64;
            if mean > 0.0 {
                result[i] = bars[i].volume / mean;
            }
            sum = sum - bars[i - self.window].volume + bars[i].volume;
        }
        result
    }

    fn last(&self, bars: &[PriceBar]) -> Option<f64> {
        let n = bars.len();
        if n <= self.window {
            return None;
        }
        let mean = bars[n - 1 - self.window..n - 1]
            .iter()
            .map(|b| b.volume)
            .sum::<f64>()
            / self.window as f64;
        (mean > 0.0).then(|| bars[n - 1].volume / mean)
    }
}

/// Map an undefined relative volume to the neutral value 1.0.
pub fn neutral_relative_volume(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn with_volumes(volumes: &[f64]) -> Vec<PriceBar> {
        let mut bars = make_bars(&vec![100.0; volumes.len()]);
        for (bar, &v) in bars.iter_mut().zip(volumes) {
            bar.volume = v;
        }
        bars
    }

    #[test]
    fn rvol_excludes_current_bar() {
        let bars = with_volumes(&[100.0, 100.0, 100.0, 300.0]);
        let result = RelativeVolume::new(3).compute(&bars);
        assert!(result[2].is_nan());
        assert_approx(result[3], 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rvol_last_matches_series() {
        let bars = with_volumes(&[100.0, 200.0, 300.0, 400.0, 100.0, 900.0]);
        let rv = RelativeVolume::new(3);
        let series = rv.compute(&bars);
        assert_approx(rv.last(&bars).unwrap(), series[5], 1e-12);
        assert_approx(series[5], 900.0 / 800.0 * 3.0, 1e-12);
    }

    #[test]
    fn flat_volume_is_one() {
        let bars = with_volumes(&[5000.0; 30]);
        let result = RelativeVolume::new(10).compute(&bars);
        for v in &result[10..] {
            assert_approx(*v, 1.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn zero_baseline_is_undefined_then_neutral() {
        let bars = with_volumes(&[0.0, 0.0, 0.0, 50.0]);
        let rv = RelativeVolume::new(3);
        assert!(rv.compute(&bars)[3].is_nan());
        assert_eq!(rv.last(&bars), None);
        assert_eq!(neutral_relative_volume(rv.last(&bars)), 1.0);
    }

    #[test]
    fn neutral_passes_defined_values_through() {
        assert_eq!(neutral_relative_volume(Some(2.5)), 2.5);
        assert_eq!(neutral_relative_volume(Some(f64::NAN)), 1.0);
    }
}
