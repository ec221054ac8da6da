//! Short-horizon statistical forecasting of closing prices.

pub mod arima;
pub mod nelder_mead;

pub use arima::{ArimaModel, ArimaOrder};

use crate::error::{Component, CoreError, Result};
use serde::Serialize;
use tracing::debug;

/// Number of periods forecast when the caller does not say otherwise.
pub const DEFAULT_HORIZON: usize = 5;

/// Point forecasts for the periods following the last observed bar.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    pub values: Vec<f64>,
    pub model: ArimaModel,
}

impl ForecastResult {
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Forecast for the very next period.
    pub fn next(&self) -> f64 {
        self.values[0]
    }
}

/// Fit an ARIMA model of `order` on `closes` and project `horizon` steps.
///
/// Every call fits afresh; nothing is carried between calls.
pub fn fit_and_forecast(
    closes: &[f64],
    order: ArimaOrder,
    horizon: usize,
) -> Result<ForecastResult> {
    if horizon == 0 {
        return Err(CoreError::invalid(
            Component::Forecast,
            "forecast horizon must be at least 1",
        ));
    }

    let model = ArimaModel::fit(closes, order)?;
    let values = model.forecast(horizon);
    if values.iter().any(|v| !v.is_finite()) {
        return Err(CoreError::fit_failure("forecast produced non-finite values"));
    }

    debug!(
        %order,
        ar = ?model.ar_coeffs,
        ma = ?model.ma_coeffs,
        sigma2 = model.sigma2,
        iterations = model.iterations,
        "fitted forecast model"
    );

    Ok(ForecastResult { values, model })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn wavy_prices(n: usize) -> Vec<f64> {
        // Deterministic but irregular: two incommensurate sines plus a slow drift.
        (0..n)
            .map(|i| {
                let t = i as f64;
                1000.0 + 0.5 * t + 25.0 * (t * 0.37).sin() + 11.0 * (t * 1.91).cos()
            })
            .collect()
    }

    #[test]
    fn forecast_has_requested_horizon() {
        let closes = wavy_prices(120);
        for horizon in [1, 5, 12] {
            let result = fit_and_forecast(&closes, ArimaOrder::default(), horizon).unwrap();
            assert_eq!(result.horizon(), horizon);
        }
    }

    #[test]
    fn zero_horizon_rejected() {
        let closes = wavy_prices(60);
        let err = fit_and_forecast(&closes, ArimaOrder::default(), 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.component(), Component::Forecast);
    }

    #[test]
    fn mean_and_next() {
        let closes = wavy_prices(80);
        let result = fit_and_forecast(&closes, ArimaOrder::new(0, 1, 0), 4).unwrap();
        let last = closes[closes.len() - 1];
        assert_eq!(result.next(), last);
        assert_eq!(result.mean(), last);
    }
}
