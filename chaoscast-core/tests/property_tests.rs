//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Logistic-map generation is deterministic
//! 2. Scaled sequences stay inside the target range
//! 3. ATR is non-negative whenever the window fits the series
//! 4. Forecasts have exactly `horizon` finite values
//! 5. The volatility gate dominates momentum and forecast

use chaoscast_core::chaos::{self, ChaosParams};
use chaoscast_core::domain::Bar;
use chaoscast_core::forecast::{fit_and_forecast, ArimaOrder};
use chaoscast_core::indicators::atr;
use chaoscast_core::signals::{DecisionRule, Signal, SignalClassifier};
use chrono::NaiveDate;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_seed() -> impl Strategy<Value = f64> {
    0.001..0.999_f64
}

fn arb_r() -> impl Strategy<Value = f64> {
    0.0..=4.0_f64
}

/// Valid OHLC bars: low ≤ open, close ≤ high, all positive.
fn arb_bars(min: usize, max: usize) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec((1.0..1000.0_f64, 0.0..50.0_f64, 0.0..1.0_f64), min..max).prop_map(
        |rows| {
            let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
            rows.into_iter()
                .enumerate()
                .map(|(i, (mid, spread, pos))| {
                    let low = mid;
                    let high = mid + spread;
                    let close = low + spread * pos;
                    Bar {
                        date: base + chrono::Duration::days(i as i64),
                        open: close,
                        high,
                        low,
                        close,
                        volume: 0,
                    }
                })
                .collect()
        },
    )
}

/// Noisy random walk seeded by proptest.
fn random_walk(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = 1000.0;
    (0..n)
        .map(|_| {
            price += rng.gen_range(-10.0..10.0);
            price
        })
        .collect()
}

// ── 1. Determinism ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn generate_is_deterministic(x0 in arb_seed(), r in arb_r(), n in 1usize..300) {
        let a = chaos::generate(x0, r, n).unwrap();
        let b = chaos::generate(x0, r, n).unwrap();
        prop_assert_eq!(a.len(), n);
        prop_assert_eq!(a, b);
    }
}

// ── 2. Range ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn scaled_sequence_within_range(
        x0 in arb_seed(),
        r in arb_r(),
        n in 1usize..200,
        min in -1.0e4..1.0e4_f64,
        span in 0.0..1.0e4_f64,
    ) {
        let max = min + span;
        let seq = chaos::generate(x0, r, n).unwrap();
        let scaled = chaos::scale_to_range(&seq, min, max).unwrap();
        prop_assert_eq!(scaled.len(), n);
        // Exact affine map: only rounding separates min + span * 1.0 from max.
        let tol = 1e-12 * (min.abs() + max.abs() + 1.0);
        for v in scaled {
            prop_assert!(v >= min - tol && v <= max + tol, "{} outside [{}, {}]", v, min, max);
        }
    }

    #[test]
    fn overlay_within_close_range(closes in prop::collection::vec(1.0..1.0e5_f64, 1..100)) {
        let prices = chaos::chaotic_prices(&ChaosParams::default(), &closes).unwrap();
        let lo = closes.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = closes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(prices.len(), closes.len() + 1);
        prop_assert!(prices.iter().all(|&p| p >= lo && p <= hi));
    }
}

// ── 3. ATR ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn atr_non_negative(bars in arb_bars(1, 60), window in 1usize..30) {
        prop_assume!(window <= bars.len());
        let value = atr::estimate(&bars, window).unwrap();
        prop_assert!(value >= 0.0);
        prop_assert!(value.is_finite());
    }
}

// ── 4. Forecast length ───────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn forecast_has_horizon_values(seed in any::<u64>(), n in 40usize..200, horizon in 1usize..15) {
        let closes = random_walk(seed, n);
        let result = fit_and_forecast(&closes, ArimaOrder::default(), horizon).unwrap();
        prop_assert_eq!(result.values.len(), horizon);
        prop_assert!(result.values.iter().all(|v| v.is_finite()));
    }
}

// ── 5. Volatility gate dominance ─────────────────────────────────────

proptest! {
    #[test]
    fn high_atr_always_holds(
        bars in arb_bars(14, 40),
        forecast in prop::collection::vec(1.0..2000.0_f64, 1..10),
    ) {
        let value = atr::estimate(&bars, 14).unwrap();
        prop_assume!(value > 0.0);
        // Any threshold strictly below the ATR gates.
        let classifier = SignalClassifier::new(value * 0.5);
        let c = classifier.classify(&bars, &forecast).unwrap();
        prop_assert_eq!(c.signal, Signal::Hold);
        prop_assert_eq!(c.rule, DecisionRule::VolatilityGate);
    }
}
