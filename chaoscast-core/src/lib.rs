//! ChaosCast Core: chaotic price overlay, ARIMA forecasting, trade signals.
//!
//! This crate contains everything behind the `chaoscast` CLI:
//! - Domain types (bars, validated price series)
//! - Logistic-map overlay scaled to the observed close range
//! - Simplified ATR volatility estimate
//! - ARIMA(p,d,q) fit by conditional sum of squares, with multi-step forecasts
//! - Buy/Hold/Sell classification from volatility, momentum and forecast
//! - Data providers (Yahoo Finance, CSV, synthetic) and TOML configuration
//! - The `evaluate` pipeline tying them together

pub mod chaos;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fingerprint;
pub mod forecast;
pub mod indicators;
pub mod pipeline;
pub mod signals;

pub use config::PipelineConfig;
pub use domain::{Bar, PriceSeries};
pub use error::{Component, CoreError, ErrorKind};
pub use pipeline::{evaluate, Evaluation};
pub use signals::Signal;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: pipeline inputs and outputs are Send + Sync.
    ///
    /// The CLI may run evaluations on worker threads; if any type stops
    /// satisfying this, the build breaks here rather than at the call site.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();

        require_send::<config::PipelineConfig>();
        require_sync::<config::PipelineConfig>();
        require_send::<pipeline::Evaluation>();
        require_sync::<pipeline::Evaluation>();
        require_send::<forecast::ArimaModel>();
        require_sync::<forecast::ArimaModel>();
        require_send::<signals::Classification>();
        require_sync::<signals::Classification>();

        require_send::<fingerprint::RunFingerprint>();
        require_sync::<fingerprint::RunFingerprint>();
        require_send::<error::CoreError>();
        require_sync::<error::CoreError>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
    }

    /// Providers are usable as trait objects behind `load_series`.
    #[test]
    fn data_provider_is_object_safe() {
        fn name_of(provider: &dyn data::DataProvider) -> &str {
            provider.name()
        }
        let synthetic = data::SyntheticProvider::default();
        assert_eq!(name_of(&synthetic), "synthetic");
    }
}
