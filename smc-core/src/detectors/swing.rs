//! Swing-point detection.
//!
//! Bar i is a swing high when `high[i]` is strictly above `high[i-2]`,
//! `high[i-1]` and `high[i+1]` (mirror rule on lows for a swing low).
//! Candidates are scanned over `2..len-2`, so the last two bars of a slice
//! are never confirmed swing points.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwingKind {
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    /// Index into the slice that was scanned.
    pub index: usize,
    pub price: f64,
    pub kind: SwingKind,
}

/// All swing points in chronological order. A bar that is both a swing high
/// and a swing low yields the high first.
pub fn find_swings(bars: &[PriceBar]) -> Vec<SwingPoint> {
    let n = bars.len();
    let mut swings = Vec::new();
    if n < 5 {
        return swings;
    }

    for i in 2..n - 2 {
        let h = bars[i].high;
        if h > bars[i - 1].high && h > bars[i - 2].high && h > bars[i + 1].high {
            swings.push(SwingPoint {
                index: i,
                price: h,
                kind: SwingKind::High,
            });
        }
        let l = bars[i].low;
        if l < bars[i - 1].low && l < bars[i - 2].low && l < bars[i + 1].low {
            swings.push(SwingPoint {
                index: i,
                price: l,
                kind: SwingKind::Low,
            });
        }
    }
    swings
}

pub(crate) fn of_kind(swings: &[SwingPoint], kind: SwingKind) -> impl Iterator<Item = &SwingPoint> {
    swings.iter().filter(move |s| s.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::bars_from_ranges;

    #[test]
    fn detects_isolated_peak_and_trough() {
        let bars = bars_from_ranges(&[
            (10.0, 8.0),
            (11.0, 9.0),
            (14.0, 12.0), // swing high
            (12.0, 10.0),
            (11.0, 7.0), // swing low
            (12.0, 9.0),
            (13.0, 10.0),
            (13.5, 11.0),
        ]);
        let swings = find_swings(&bars);
        assert_eq!(
            swings,
            vec![
                SwingPoint {
                    index: 2,
                    price: 14.0,
                    kind: SwingKind::High
                },
                SwingPoint {
                    index: 4,
                    price: 7.0,
                    kind: SwingKind::Low
                },
            ]
        );
    }

    #[test]
    fn equal_highs_are_not_swings() {
        let bars = bars_from_ranges(&[(10.0, 8.0), (11.0, 9.0), (11.0, 9.5), (10.0, 9.0), (9.0, 8.5)]);
        assert!(of_kind(&find_swings(&bars), SwingKind::High).next().is_none());
    }

    #[test]
    fn last_two_bars_never_swing() {
        // Bar 5 would be a swing low if the rule looked at it.
        let bars = bars_from_ranges(&[
            (10.0, 9.0),
            (10.0, 9.0),
            (10.0, 9.0),
            (10.0, 9.0),
            (10.0, 9.0),
            (10.0, 5.0),
            (10.0, 9.0),
        ]);
        let swings = find_swings(&bars);
        assert!(swings.iter().all(|s| s.index + 2 < bars.len()));
        assert!(swings.is_empty());
    }

    #[test]
    fn short_slices_yield_nothing() {
        let bars = bars_from_ranges(&[(10.0, 9.0), (12.0, 8.0), (10.0, 9.0), (9.0, 8.0)]);
        assert!(find_swings(&bars).is_empty());
    }
}
