//! Domain types for chaoscast

pub mod bar;
pub mod series;

pub use bar::{Bar, BarError};
pub use series::PriceSeries;

/// Symbol type alias
pub type Symbol = String;
