//! Pipeline configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! [chaos]
//! x0 = 0.5
//! r = 3.9
//!
//! [model]
//! p = 1
//! d = 1
//! q = 1
//! horizon = 5
//!
//! [classifier]
//! atr_threshold = 500.0
//! atr_window = 14
//! momentum_pct = 1.5
//! ```

use crate::chaos::ChaosParams;
use crate::error::{Component, CoreError};
use crate::forecast::{ArimaOrder, DEFAULT_HORIZON};
use crate::indicators::atr::DEFAULT_WINDOW;
use crate::signals::classifier::{SignalClassifier, DEFAULT_MOMENTUM_PCT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// ATR threshold tuned for daily BTC-USD bars.
pub const DEFAULT_ATR_THRESHOLD: f64 = 500.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub horizon: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let order = ArimaOrder::default();
        Self {
            p: order.p,
            d: order.d,
            q: order.q,
            horizon: DEFAULT_HORIZON,
        }
    }
}

impl ModelConfig {
    pub fn order(&self) -> ArimaOrder {
        ArimaOrder::new(self.p, self.d, self.q)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub atr_threshold: f64,
    pub atr_window: usize,
    pub momentum_pct: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            atr_threshold: DEFAULT_ATR_THRESHOLD,
            atr_window: DEFAULT_WINDOW,
            momentum_pct: DEFAULT_MOMENTUM_PCT,
        }
    }
}

impl ClassifierConfig {
    pub fn classifier(&self) -> SignalClassifier {
        SignalClassifier::new(self.atr_threshold)
            .with_atr_window(self.atr_window)
            .with_momentum_pct(self.momentum_pct)
    }
}

/// Everything `pipeline::evaluate` needs besides the price series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub chaos: ChaosParams,
    pub model: ModelConfig,
    pub classifier: ClassifierConfig,
}

impl PipelineConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Check every parameter against its domain before any computation runs.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.chaos.validate()?;
        self.model.order().validate()?;
        if self.model.horizon == 0 {
            return Err(CoreError::invalid(
                Component::Forecast,
                "forecast horizon must be at least 1",
            ));
        }
        self.classifier.classifier().validate()
    }
}
