//! Fetch-and-validate: turn a provider's raw bars into a `PriceSeries`.

use super::provider::{DataError, DataProvider, DataSource};
use crate::domain::PriceSeries;
use chrono::NaiveDate;
use tracing::{info, warn};

/// A validated series plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: PriceSeries,
    pub source: DataSource,
    /// Void bars (any NaN OHLC field) removed before validation.
    pub dropped: usize,
}

/// Fetch `[start, end]` for `symbol` and validate the result.
///
/// Void bars are dropped with a warning. Bars are sorted by date because
/// providers make no ordering promise; duplicates and bad values still fail.
pub fn load_series(
    provider: &dyn DataProvider,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<LoadedSeries, DataError> {
    if start > end {
        return Err(DataError::InvalidRange { start, end });
    }

    let fetched = provider.fetch(symbol, start, end)?;
    let total = fetched.bars.len();

    let mut bars: Vec<_> = fetched.bars.into_iter().filter(|b| !b.is_void()).collect();
    let dropped = total - bars.len();
    if dropped > 0 {
        warn!(symbol, dropped, "dropped void bars");
    }

    if bars.is_empty() {
        return Err(DataError::NoData {
            symbol: symbol.to_string(),
            start,
            end,
        });
    }

    bars.sort_by_key(|b| b.date);

    let series = PriceSeries::new(fetched.symbol, bars).map_err(|source| {
        DataError::Validation {
            symbol: symbol.to_string(),
            source,
        }
    })?;

    info!(
        symbol,
        provider = provider.name(),
        bars = series.len(),
        "loaded price series"
    );

    Ok(LoadedSeries {
        series,
        source: fetched.source,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::FetchResult;
    use crate::domain::{Bar, BarError};

    struct FixedProvider(Vec<Bar>);

    impl DataProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(
            &self,
            symbol: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<FetchResult, DataError> {
            Ok(FetchResult {
                symbol: symbol.to_string(),
                bars: self.0.clone(),
                source: DataSource::CsvImport,
            })
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: d(day),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 0,
        }
    }

    #[test]
    fn drops_void_and_sorts() {
        let mut void = bar(3, 10.0);
        void.close = f64::NAN;
        let provider = FixedProvider(vec![bar(4, 12.0), void, bar(2, 11.0)]);
        let loaded = load_series(&provider, "X", d(1), d(31)).unwrap();
        assert_eq!(loaded.dropped, 1);
        assert_eq!(loaded.series.closes(), vec![11.0, 12.0]);
        assert_eq!(loaded.source, DataSource::CsvImport);
    }

    #[test]
    fn all_void_is_no_data() {
        let mut void = bar(3, 10.0);
        void.open = f64::NAN;
        let err = load_series(&FixedProvider(vec![void]), "X", d(1), d(31)).unwrap_err();
        assert!(matches!(err, DataError::NoData { .. }));
    }

    #[test]
    fn inverted_range_rejected_before_fetch() {
        let err = load_series(&FixedProvider(vec![bar(2, 1.0)]), "X", d(5), d(1)).unwrap_err();
        assert!(matches!(err, DataError::InvalidRange { .. }));
    }

    #[test]
    fn inverted_bar_fails_validation() {
        let mut bad = bar(3, 10.0);
        bad.low = bad.high + 1.0;
        let err = load_series(&FixedProvider(vec![bar(2, 1.0), bad]), "X", d(1), d(31))
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::Validation {
                source: BarError::InvalidValue { index: 1, .. },
                ..
            }
        ));
    }

    #[test]
    fn duplicate_dates_fail_validation() {
        let provider = FixedProvider(vec![bar(2, 1.0), bar(2, 2.0)]);
        match load_series(&provider, "X", d(1), d(31)).unwrap_err() {
            DataError::Validation { source, .. } => {
                assert!(matches!(source, BarError::DuplicateDate { .. }))
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn negative_price_fails_validation() {
        let provider = FixedProvider(vec![bar(2, 1.0), bar(3, -5.0)]);
        let err = load_series(&provider, "X", d(1), d(31)).unwrap_err();
        assert!(matches!(err, DataError::Validation { .. }));
    }
}
