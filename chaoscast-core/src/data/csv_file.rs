//! CSV file provider.
//!
//! Reads the layout of a Yahoo Finance history export:
//! `Date,Open,High,Low,Close[,Adj Close][,Volume]`. Headers may also be
//! lowercase and extra columns are ignored. Unparseable cells (`null`, empty)
//! become NaN so `load_series` can drop the row as a void bar.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::Bar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date", alias = "date")]
    date: NaiveDate,
    #[serde(rename = "Open", alias = "open", deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(rename = "High", alias = "high", deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(rename = "Low", alias = "low", deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(rename = "Close", alias = "close", deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(
        rename = "Volume",
        alias = "volume",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    volume: Option<f64>,
}

impl CsvRow {
    fn into_bar(self) -> Bar {
        Bar {
            date: self.date,
            open: self.open.unwrap_or(f64::NAN),
            high: self.high.unwrap_or(f64::NAN),
            low: self.low.unwrap_or(f64::NAN),
            close: self.close.unwrap_or(f64::NAN),
            volume: self
                .volume
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u64)
                .unwrap_or(0),
        }
    }
}

/// Offline provider backed by a single CSV file.
///
/// The symbol passed to `fetch` only labels the result; the file is assumed
/// to hold that symbol's history.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn csv_error(&self, message: impl ToString) -> DataError {
        DataError::Csv {
            path: self.path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Every row in file order, before date filtering.
    pub fn read_all(&self) -> Result<Vec<Bar>, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| self.csv_error(e))?;

        let mut bars = Vec::new();
        for (line, record) in reader.deserialize::<CsvRow>().enumerate() {
            // +2: one for the header, one for 1-based numbering.
            let row = record.map_err(|e| self.csv_error(format!("row {}: {e}", line + 2)))?;
            bars.push(row.into_bar());
        }
        Ok(bars)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars = self
            .read_all()?
            .into_iter()
            .filter(|bar| bar.date >= start && bar.date <= end)
            .collect();

        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::CsvImport,
        })
    }
}
