//! Simplified Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|). The |low-prev_close| term of
//! the textbook definition is not used.
//! ATR: plain mean of the FIRST `window` true-range values, not a rolling or
//! Wilder-smoothed series. The classifier's thresholds are tuned to this.

use crate::domain::Bar;
use crate::error::{Component, CoreError, Result};
use serde::{Deserialize, Serialize};

/// Window length the classifier thresholds were tuned for.
pub const DEFAULT_WINDOW: usize = 14;

/// Compute the two-term True Range series from bars.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let range = bar.high - bar.low;
        if i == 0 {
            tr.push(range);
        } else {
            let pc = bars[i - 1].close;
            tr.push(range.max((bar.high - pc).abs()));
        }
    }
    tr
}

/// Mean true range over the leading `window` bars.
pub fn estimate(bars: &[Bar], window: usize) -> Result<f64> {
    if window == 0 {
        return Err(CoreError::invalid(
            Component::Volatility,
            "ATR window must be at least 1",
        ));
    }
    if bars.len() < window {
        return Err(CoreError::insufficient(
            Component::Volatility,
            window,
            bars.len(),
        ));
    }

    let tr = true_range(&bars[..window]);
    Ok(tr.iter().sum::<f64>() / window as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityEstimator {
    pub window: usize,
}

impl VolatilityEstimator {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn estimate(&self, bars: &[Bar]) -> Result<f64> {
        estimate(bars, self.window)
    }
}

impl Default for VolatilityEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::indicators::{assert_approx, make_bars, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 105-95 = 10
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|) = 9
        ]);
        let tr = true_range(&bars);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // TR = max(7, |115-100|) = 15
        ]);
        assert_approx(true_range(&bars)[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_down_ignores_low_term() {
        // Textbook TR would be |90-100| = 10; the two-term form sees max(5, |95-100|) = 5.
        let bars = make_ohlc_bars(&[(98.0, 102.0, 97.0, 100.0), (93.0, 95.0, 90.0, 91.0)]);
        assert_approx(true_range(&bars)[1], 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn estimate_uses_leading_window_only() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),   // 10
            (102.0, 108.0, 100.0, 106.0),  // 8
            (106.0, 107.0, 98.0, 99.0),    // 9
            (99.0, 199.0, 99.0, 150.0),    // 100, outside the window
        ]);
        assert_approx(estimate(&bars, 3).unwrap(), 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn estimate_is_plain_mean_of_window() {
        let bars = make_ohlc_bars(&[
            (100.0, 104.0, 96.0, 100.0), // 8
            (100.0, 101.0, 99.0, 100.0), // max(2, 1) = 2
        ]);
        assert_approx(estimate(&bars, 2).unwrap(), 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn estimate_insufficient_bars() {
        let bars = make_bars(&[100.0]);
        let err = estimate(&bars, 14).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert_eq!(err.component(), Component::Volatility);
    }

    #[test]
    fn estimate_zero_window_rejected() {
        let bars = make_bars(&[100.0, 101.0]);
        assert_eq!(
            estimate(&bars, 0).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn estimator_default_window() {
        assert_eq!(VolatilityEstimator::default().window, 14);
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let atr = VolatilityEstimator::default()
            .estimate(&make_bars(&closes))
            .unwrap();
        // make_bars: high = max(open, close) + 1, low = min(open, close) - 1.
        // Bar 0: 2. Bars 1..13: range 3, |high - prev_close| = 2 -> 3.
        assert_approx(atr, (2.0 + 13.0 * 3.0) / 14.0, DEFAULT_EPSILON);
    }
}
