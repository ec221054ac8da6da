//! Trading signal type and the rule-based classifier that produces it.

pub mod classifier;

pub use classifier::{Classification, DecisionRule, SignalClassifier};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Recommendation for the next period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Hold,
    Sell,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Signal::Buy => "Buy",
            Signal::Hold => "Hold",
            Signal::Sell => "Sell",
        })
    }
}
