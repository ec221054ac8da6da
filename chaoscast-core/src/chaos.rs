//! Logistic-map sequence generator.
//!
//! `x[i] = r * x[i-1] * (1 - x[i-1])` stays inside [0, 1] for x0 in (0, 1) and
//! r in [0, 4]. Rescaled into the observed close range it gives a synthetic
//! "chaotic price" overlay. It is an illustration, not a forecast.

use crate::error::{Component, CoreError, Result};
use serde::{Deserialize, Serialize};

/// Seed and control parameter of the logistic map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaosParams {
    pub x0: f64,
    pub r: f64,
}

impl Default for ChaosParams {
    fn default() -> Self {
        Self { x0: 0.5, r: 3.9 }
    }
}

impl ChaosParams {
    pub fn validate(&self) -> Result<()> {
        if !self.x0.is_finite() || self.x0 <= 0.0 || self.x0 >= 1.0 {
            return Err(CoreError::invalid(
                Component::Chaos,
                format!("seed x0 must lie in (0, 1), got {}", self.x0),
            ));
        }
        if !self.r.is_finite() || !(0.0..=4.0).contains(&self.r) {
            return Err(CoreError::invalid(
                Component::Chaos,
                format!("control parameter r must lie in [0, 4], got {}", self.r),
            ));
        }
        Ok(())
    }
}

/// Generate `n` logistic-map values starting at `x0`.
pub fn generate(x0: f64, r: f64, n: usize) -> Result<Vec<f64>> {
    ChaosParams { x0, r }.validate()?;
    if n < 1 {
        return Err(CoreError::invalid(
            Component::Chaos,
            "sequence length must be at least 1",
        ));
    }

    let mut x = Vec::with_capacity(n);
    x.push(x0);
    for i in 1..n {
        let prev = x[i - 1];
        x.push(r * prev * (1.0 - prev));
    }
    Ok(x)
}

/// Affine map `target_min + (target_max - target_min) * s` of each value.
///
/// Inputs outside [0, 1] land outside the target range; nothing is clamped.
pub fn scale_to_range(sequence: &[f64], target_min: f64, target_max: f64) -> Result<Vec<f64>> {
    if !target_min.is_finite() || !target_max.is_finite() {
        return Err(CoreError::invalid(
            Component::Chaos,
            "range bounds must be finite",
        ));
    }
    if target_max < target_min {
        return Err(CoreError::invalid(
            Component::Chaos,
            format!("range is inverted: max {target_max} < min {target_min}"),
        ));
    }

    let span = target_max - target_min;
    Ok(sequence.iter().map(|s| target_min + span * s).collect())
}

/// Chaotic price overlay for a close series: `closes.len() + 1` points, the
/// last one standing in for the next, unobserved period.
pub fn chaotic_prices(params: &ChaosParams, closes: &[f64]) -> Result<Vec<f64>> {
    if closes.is_empty() {
        return Err(CoreError::insufficient(Component::Chaos, 1, 0));
    }
    let (lo, hi) = closes
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| {
            (lo.min(c), hi.max(c))
        });
    let sequence = generate(params.x0, params.r, closes.len() + 1)?;
    let scaled = scale_to_range(&sequence, lo, hi)?;
    // generate stays in [0, 1]; only rounding of lo + span * 1.0 can overshoot.
    Ok(scaled.into_iter().map(|p| p.clamp(lo, hi)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn first_values_follow_recurrence() {
        let x = generate(0.5, 3.9, 3).unwrap();
        assert_eq!(x[0], 0.5);
        assert_eq!(x[1], 3.9 * 0.5 * 0.5);
        assert_eq!(x[2], 3.9 * x[1] * (1.0 - x[1]));
    }

    #[test]
    fn single_point_is_the_seed() {
        assert_eq!(generate(0.2, 3.7, 1).unwrap(), vec![0.2]);
    }

    #[test]
    fn seed_outside_unit_interval_rejected() {
        for x0 in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let err = generate(x0, 3.9, 10).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
            assert_eq!(err.component(), Component::Chaos);
        }
    }

    #[test]
    fn zero_length_rejected() {
        assert_eq!(
            generate(0.5, 3.9, 0).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn r_above_four_rejected() {
        assert!(generate(0.5, 4.2, 10).is_err());
    }

    #[test]
    fn scale_maps_endpoints() {
        let scaled = scale_to_range(&[0.0, 0.5, 1.0], 100.0, 200.0).unwrap();
        assert_eq!(scaled, vec![100.0, 150.0, 200.0]);
    }

    #[test]
    fn scale_is_plain_affine_outside_unit_interval() {
        let scaled = scale_to_range(&[2.0, -0.5], 0.0, 10.0).unwrap();
        assert_eq!(scaled, vec![20.0, -5.0]);
    }

    #[test]
    fn scale_inverted_range_rejected() {
        let err = scale_to_range(&[0.5], 10.0, 5.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn scale_degenerate_range_collapses() {
        let scaled = scale_to_range(&[0.1, 0.9], 7.0, 7.0).unwrap();
        assert_eq!(scaled, vec![7.0, 7.0]);
    }

    #[test]
    fn chaotic_prices_has_one_extra_point_within_range() {
        let closes = [120.0, 95.0, 130.0, 110.0];
        let prices = chaotic_prices(&ChaosParams::default(), &closes).unwrap();
        assert_eq!(prices.len(), closes.len() + 1);
        assert!(prices.iter().all(|p| (95.0..=130.0).contains(p)));
    }

    #[test]
    fn chaotic_prices_empty_input() {
        let err = chaotic_prices(&ChaosParams::default(), &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
    }
}
