//! Error kinds raised by the decision pipeline.
//!
//! Every variant names the component that raised it so the caller of
//! `pipeline::evaluate` can tell a volatility failure from a forecast failure
//! without string matching.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Pipeline component that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Component {
    Chaos,
    Volatility,
    Forecast,
    Classifier,
    Pipeline,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Chaos => "chaos generator",
            Component::Volatility => "volatility estimator",
            Component::Forecast => "forecast model",
            Component::Classifier => "signal classifier",
            Component::Pipeline => "pipeline",
        };
        f.write_str(name)
    }
}

/// Discriminant of [`CoreError`], handy for assertions and exit-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameter,
    InsufficientData,
    ModelFitFailure,
    DivisionByZero,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("{component}: invalid parameter: {reason}")]
    InvalidParameter { component: Component, reason: String },

    #[error("{component}: insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        component: Component,
        required: usize,
        actual: usize,
    },

    #[error("{component}: model fit failed: {reason}")]
    ModelFitFailure { component: Component, reason: String },

    #[error("{component}: division by zero: {reason}")]
    DivisionByZero { component: Component, reason: String },
}

impl CoreError {
    pub fn invalid(component: Component, reason: impl Into<String>) -> Self {
        CoreError::InvalidParameter {
            component,
            reason: reason.into(),
        }
    }

    pub fn insufficient(component: Component, required: usize, actual: usize) -> Self {
        CoreError::InsufficientData {
            component,
            required,
            actual,
        }
    }

    pub fn fit_failure(reason: impl Into<String>) -> Self {
        CoreError::ModelFitFailure {
            component: Component::Forecast,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            CoreError::InsufficientData { .. } => ErrorKind::InsufficientData,
            CoreError::ModelFitFailure { .. } => ErrorKind::ModelFitFailure,
            CoreError::DivisionByZero { .. } => ErrorKind::DivisionByZero,
        }
    }

    pub fn component(&self) -> Component {
        match self {
            CoreError::InvalidParameter { component, .. }
            | CoreError::InsufficientData { component, .. }
            | CoreError::ModelFitFailure { component, .. }
            | CoreError::DivisionByZero { component, .. } => *component,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
