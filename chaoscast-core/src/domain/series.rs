//! PriceSeries: a validated, chronologically ordered run of bars for one symbol.

use super::bar::{Bar, BarError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Validate and wrap `bars`.
    ///
    /// Dates must be strictly increasing and every bar must pass
    /// [`Bar::is_valid`]. Bars are not reordered here; `load_series` sorts
    /// provider output before calling this, so only duplicates and bad values
    /// fail there.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, BarError> {
        if bars.is_empty() {
            return Err(BarError::Empty);
        }

        for (index, bar) in bars.iter().enumerate() {
            if !bar.is_valid() {
                return Err(BarError::InvalidValue {
                    index,
                    date: bar.date,
                });
            }
            if index == 0 {
                continue;
            }
            let previous = bars[index - 1].date;
            if bar.date == previous {
                return Err(BarError::DuplicateDate {
                    index,
                    date: bar.date,
                });
            }
            if bar.date < previous {
                return Err(BarError::OutOfOrder {
                    index,
                    date: bar.date,
                    previous,
                });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first(&self) -> &Bar {
        &self.bars[0]
    }

    pub fn last(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }
}
