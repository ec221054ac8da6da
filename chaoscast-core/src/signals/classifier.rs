//! Volatility → momentum → forecast decision tree.
//!
//! Rules are evaluated in priority order and the first one that decides wins:
//! 1. volatility gate: ATR above threshold → Hold
//! 2. momentum gate: |day-over-day % change| ≥ threshold → direction of the move
//! 3. forecast gate: mean forecast vs last close

use super::Signal;
use crate::domain::Bar;
use crate::error::{Component, CoreError, Result};
use crate::indicators::atr;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Percentage move treated as a regime jump that overrides the forecast.
pub const DEFAULT_MOMENTUM_PCT: f64 = 1.5;

/// Which rule produced the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionRule {
    VolatilityGate,
    MomentumGate,
    ForecastGate,
}

/// The signal plus the values each rule saw. Rules that were shadowed by an
/// earlier decision leave their values as `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub signal: Signal,
    pub rule: DecisionRule,
    pub atr: f64,
    pub pct_change: Option<f64>,
    pub forecast_mean: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalClassifier {
    pub atr_threshold: f64,
    pub atr_window: usize,
    pub momentum_pct: f64,
}

impl SignalClassifier {
    pub fn new(atr_threshold: f64) -> Self {
        Self {
            atr_threshold,
            atr_window: atr::DEFAULT_WINDOW,
            momentum_pct: DEFAULT_MOMENTUM_PCT,
        }
    }

    pub fn with_atr_window(mut self, window: usize) -> Self {
        self.atr_window = window;
        self
    }

    pub fn with_momentum_pct(mut self, pct: f64) -> Self {
        self.momentum_pct = pct;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.atr_threshold.is_finite() || self.atr_threshold < 0.0 {
            return Err(CoreError::invalid(
                Component::Classifier,
                format!("ATR threshold must be finite and >= 0, got {}", self.atr_threshold),
            ));
        }
        if !self.momentum_pct.is_finite() || self.momentum_pct < 0.0 {
            return Err(CoreError::invalid(
                Component::Classifier,
                format!("momentum threshold must be finite and >= 0, got {}", self.momentum_pct),
            ));
        }
        if self.atr_window == 0 {
            return Err(CoreError::invalid(
                Component::Classifier,
                "ATR window must be at least 1",
            ));
        }
        Ok(())
    }

    /// Classify the next period from the observed bars and a price forecast.
    pub fn classify(&self, bars: &[Bar], forecast: &[f64]) -> Result<Classification> {
        self.validate()?;
        if bars.len() < 2 {
            return Err(CoreError::insufficient(Component::Classifier, 2, bars.len()));
        }
        if forecast.is_empty() {
            return Err(CoreError::insufficient(Component::Classifier, 1, 0));
        }

        let atr = atr::estimate(bars, self.atr_window)?;
        if atr > self.atr_threshold {
            debug!(atr, threshold = self.atr_threshold, "volatility gate: hold");
            return Ok(Classification {
                signal: Signal::Hold,
                rule: DecisionRule::VolatilityGate,
                atr,
                pct_change: None,
                forecast_mean: None,
            });
        }

        let last_close = bars[bars.len() - 1].close;
        let prev_close = bars[bars.len() - 2].close;
        let pct_change = percent_change(prev_close, last_close)?;
        if pct_change.abs() >= self.momentum_pct {
            let signal = if pct_change > 0.0 {
                Signal::Buy
            } else {
                Signal::Sell
            };
            debug!(pct_change, %signal, "momentum gate");
            return Ok(Classification {
                signal,
                rule: DecisionRule::MomentumGate,
                atr,
                pct_change: Some(pct_change),
                forecast_mean: None,
            });
        }

        let forecast_mean = forecast.iter().sum::<f64>() / forecast.len() as f64;
        let signal = if forecast_mean > last_close {
            Signal::Buy
        } else if forecast_mean < last_close {
            Signal::Sell
        } else {
            Signal::Hold
        };
        debug!(forecast_mean, last_close, %signal, "forecast gate");

        Ok(Classification {
            signal,
            rule: DecisionRule::ForecastGate,
            atr,
            pct_change: Some(pct_change),
            forecast_mean: Some(forecast_mean),
        })
    }
}

/// Day-over-day change in percent.
pub fn percent_change(prev_close: f64, last_close: f64) -> Result<f64> {
    if prev_close == 0.0 {
        return Err(CoreError::DivisionByZero {
            component: Component::Classifier,
            reason: "previous close is zero".into(),
        });
    }
    Ok((last_close - prev_close) / prev_close * 100.0)
}
