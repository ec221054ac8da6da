//! Bar: one period of OHLC market data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily OHLC bar with volume.
///
/// Volume is carried for display only; none of the pipeline components read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// OHLC values are finite and non-negative, and high is not below low.
    pub fn is_valid(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
            && self.high >= self.low
    }
}

/// Why a run of bars could not become a `PriceSeries`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("series is empty")]
    Empty,

    #[error("bar {index} ({date}) has a non-finite or negative OHLC value, or high below low")]
    InvalidValue { index: usize, date: NaiveDate },

    #[error("bar {index} ({date}) duplicates the previous timestamp")]
    DuplicateDate { index: usize, date: NaiveDate },

    #[error("bar {index} ({date}) is earlier than the previous bar ({previous})")]
    OutOfOrder {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },
}
