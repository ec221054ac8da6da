//! Pipeline orchestrator: chaos overlay → forecast → classification.
//!
//! `evaluate` is the only entry point the CLI needs. It owns no state; every
//! run fits afresh and any component error is returned unchanged.

use crate::chaos;
use crate::config::PipelineConfig;
use crate::domain::PriceSeries;
use crate::error::{Component, CoreError, Result};
use crate::forecast::{self, ForecastResult};
use crate::signals::{Classification, Signal};
use serde::Serialize;
use tracing::{debug, info};

/// The three artifacts of one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    /// `len(series) + 1` chaotic prices; the last entry is the next period.
    pub chaotic_series: Vec<f64>,
    pub forecast: ForecastResult,
    pub classification: Classification,
}

impl Evaluation {
    pub fn signal(&self) -> Signal {
        self.classification.signal
    }

    /// Chaotic price standing in for the next, unobserved period.
    pub fn next_chaotic_price(&self) -> f64 {
        self.chaotic_series[self.chaotic_series.len() - 1]
    }

    /// Last `n` chaotic prices (fewer if the series is shorter).
    pub fn chaotic_tail(&self, n: usize) -> &[f64] {
        let start = self.chaotic_series.len().saturating_sub(n);
        &self.chaotic_series[start..]
    }
}

pub fn evaluate(series: &PriceSeries, config: &PipelineConfig) -> Result<Evaluation> {
    if series.is_empty() {
        return Err(CoreError::insufficient(Component::Pipeline, 1, 0));
    }
    let closes = series.closes();

    let chaotic_series = chaos::chaotic_prices(&config.chaos, &closes)?;
    debug!(points = chaotic_series.len(), "generated chaotic overlay");

    let forecast = forecast::fit_and_forecast(&closes, config.model.order(), config.model.horizon)?;

    let classification = config
        .classifier
        .classifier()
        .classify(series.bars(), &forecast.values)?;

    info!(
        symbol = series.symbol(),
        bars = series.len(),
        signal = %classification.signal,
        rule = ?classification.rule,
        "evaluation complete"
    );

    Ok(Evaluation {
        chaotic_series,
        forecast,
        classification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use crate::error::ErrorKind;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                date: base + chrono::Duration::days(i as i64),
                open: c,
                high: c + 2.0,
                low: c - 2.0,
                close: c,
                volume: 0,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    fn closes(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                200.0 + 0.2 * t + 3.0 * (t * 0.41).sin() + 1.3 * (t * 2.3).cos()
            })
            .collect()
    }

    #[test]
    fn evaluate_produces_all_artifacts() {
        let s = series(&closes(90));
        let eval = evaluate(&s, &PipelineConfig::default()).unwrap();
        assert_eq!(eval.chaotic_series.len(), 91);
        assert_eq!(eval.forecast.horizon(), 5);
        assert_eq!(eval.chaotic_tail(5).len(), 5);
        assert_eq!(eval.next_chaotic_price(), eval.chaotic_series[90]);
    }

    #[test]
    fn forecast_error_propagates_unchanged() {
        let s = series(&closes(3));
        let err = evaluate(&s, &PipelineConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModelFitFailure);
        assert_eq!(err.component(), Component::Forecast);
    }

    #[test]
    fn chaos_error_propagates_unchanged() {
        let mut config = PipelineConfig::default();
        config.chaos.x0 = 0.0;
        let err = evaluate(&series(&closes(40)), &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.component(), Component::Chaos);
    }
}
