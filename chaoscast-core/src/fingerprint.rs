//! Run fingerprinting: deterministic identity for (configuration, dataset) pairs.
//!
//! Two evaluations with the same `run_id` saw byte-identical bars and the same
//! parameters, so they must produce the same signal.

use crate::config::PipelineConfig;
use crate::domain::PriceSeries;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub config_hash: String,
    pub dataset_hash: String,
}

impl RunFingerprint {
    pub fn new(config: &PipelineConfig, series: &PriceSeries) -> Self {
        Self {
            config_hash: config_hash(config),
            dataset_hash: dataset_hash(series),
        }
    }

    /// Combined identity of the run.
    pub fn run_id(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.config_hash.as_bytes());
        hasher.update(self.dataset_hash.as_bytes());
        hasher.finalize().to_hex().to_string()
    }
}

/// BLAKE3 over the canonical JSON of the configuration.
///
/// Struct fields serialize in declaration order, so the JSON is stable.
pub fn config_hash(config: &PipelineConfig) -> String {
    let json = serde_json::to_string(config).unwrap_or_default();
    blake3::hash(json.as_bytes()).to_hex().to_string()
}

/// BLAKE3 over the symbol and every bar's date and OHLCV bytes.
pub fn dataset_hash(series: &PriceSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(series.symbol().as_bytes());
    for bar in series.bars() {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
