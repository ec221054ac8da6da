//! ARIMA(p, d, q) estimation and forecasting.
//!
//! Fitting pipeline:
//! 1. Difference the series `d` times. With `d == 0` the sample mean is
//!    removed; with `d > 0` no trend term is fitted.
//! 2. Hannan–Rissanen regressions give starting ARMA coefficients.
//! 3. Coefficients are searched in an unconstrained space mapped through the
//!    Durbin–Levinson (partial autocorrelation) transform, which keeps the AR
//!    polynomial stationary and the MA polynomial invertible.
//! 4. Nelder–Mead minimises the conditional sum of squares (CSS).
//!
//! Forecasts run the ARMA recursion with future innovations at zero and are
//! integrated back to price level from the tail of each differencing level.

use super::nelder_mead::{self, NelderMeadOptions};
use crate::error::{Component, CoreError, Result};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const MAX_LAG: usize = 10;
pub const MAX_DIFF: usize = 2;

/// Model order: AR lags, differencing order, MA lags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    pub fn validate(&self) -> Result<()> {
        if self.p > MAX_LAG || self.q > MAX_LAG {
            return Err(CoreError::invalid(
                Component::Forecast,
                format!("lag orders must be <= {MAX_LAG}, got p={} q={}", self.p, self.q),
            ));
        }
        if self.d > MAX_DIFF {
            return Err(CoreError::invalid(
                Component::Forecast,
                format!("differencing order must be <= {MAX_DIFF}, got d={}", self.d),
            ));
        }
        Ok(())
    }

    /// Shortest series the model can be fitted on.
    pub fn min_len(&self) -> usize {
        self.p + self.d + self.q + 1
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl std::fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// A fitted ARIMA model.
#[derive(Debug, Clone, Serialize)]
pub struct ArimaModel {
    pub order: ArimaOrder,
    pub ar_coeffs: Vec<f64>,
    pub ma_coeffs: Vec<f64>,
    /// Mean of the differenced series; zero when `d > 0`.
    pub mean: f64,
    pub sigma2: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Residuals entering the likelihood.
    pub nobs: usize,
    pub iterations: usize,
    /// Differenced, demeaned series the coefficients were fitted on.
    #[serde(skip)]
    z: Vec<f64>,
    #[serde(skip)]
    residuals: Vec<f64>,
    /// Last observed value of each differencing level, level 0 = raw series.
    #[serde(skip)]
    tails: Vec<f64>,
}

impl ArimaModel {
    pub fn fit(data: &[f64], order: ArimaOrder) -> Result<Self> {
        Self::fit_with_options(data, order, &NelderMeadOptions::default())
    }

    pub(crate) fn fit_with_options(
        data: &[f64],
        order: ArimaOrder,
        options: &NelderMeadOptions,
    ) -> Result<Self> {
        order.validate()?;
        let ArimaOrder { p, d, q } = order;

        if data.len() < order.min_len() {
            return Err(CoreError::fit_failure(format!(
                "{order} needs at least {} points, got {}",
                order.min_len(),
                data.len()
            )));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::fit_failure("series contains non-finite values"));
        }
        if is_constant(data) {
            return Err(CoreError::fit_failure("series is constant"));
        }

        let mut tails = Vec::with_capacity(d);
        let mut w = data.to_vec();
        for _ in 0..d {
            tails.push(w[w.len() - 1]);
            w = difference(&w, 1);
        }
        if w.len() > 1 && is_constant(&w) {
            return Err(CoreError::fit_failure(
                "differenced series has no variation",
            ));
        }

        let mean = if d == 0 { mean(&w) } else { 0.0 };
        let z: Vec<f64> = w.iter().map(|v| v - mean).collect();

        let (ar_coeffs, ma_coeffs, iterations) = if p + q == 0 {
            (Vec::new(), Vec::new(), 0)
        } else {
            let start = hannan_rissanen(&z, p, q)
                .map(|(phi, theta)| to_unconstrained(&phi, &theta))
                .unwrap_or_else(|| vec![0.0; p + q]);

            let objective = |params: &[f64]| {
                let (phi, theta) = from_unconstrained(params, p);
                conditional_sum_of_squares(&z, &phi, &theta)
            };
            let min = nelder_mead::minimize(objective, &start, options);

            if !min.converged {
                return Err(CoreError::fit_failure(format!(
                    "optimizer did not converge after {} iterations",
                    min.iterations
                )));
            }
            if !min.value.is_finite() {
                return Err(CoreError::fit_failure("objective is not finite at the optimum"));
            }
            let (phi, theta) = from_unconstrained(&min.x, p);
            (phi, theta, min.iterations)
        };

        let residuals = css_residuals(&z, &ar_coeffs, &ma_coeffs);
        let nobs = z.len() - p;
        let sigma2 = residuals[p..].iter().map(|e| e * e).sum::<f64>() / nobs as f64;
        if !sigma2.is_finite() || sigma2 <= 0.0 {
            return Err(CoreError::fit_failure(format!(
                "degenerate residual variance {sigma2}"
            )));
        }

        let n = nobs as f64;
        let log_likelihood = -0.5 * n * ((2.0 * PI * sigma2).ln() + 1.0);
        let k = (p + q + 1 + usize::from(d == 0)) as f64;
        let aic = -2.0 * log_likelihood + 2.0 * k;
        let bic = -2.0 * log_likelihood + k * n.ln();

        Ok(Self {
            order,
            ar_coeffs,
            ma_coeffs,
            mean,
            sigma2,
            log_likelihood,
            aic,
            bic,
            nobs,
            iterations,
            z,
            residuals,
            tails,
        })
    }

    /// Point forecasts for the next `horizon` periods, on the original scale.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let p = self.order.p;
        let q = self.order.q;
        let mut z = self.z.clone();
        let mut e = self.residuals.clone();
        let mut out = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let t = z.len();
            let mut pred = 0.0;
            for (i, phi) in self.ar_coeffs.iter().enumerate().take(p) {
                pred += phi * z[t - 1 - i];
            }
            for (j, theta) in self.ma_coeffs.iter().enumerate().take(q) {
                if t > j {
                    pred += theta * e[t - 1 - j];
                }
            }
            z.push(pred);
            e.push(0.0);
            out.push(pred + self.mean);
        }

        for &last in self.tails.iter().rev() {
            let mut level = last;
            out = out
                .iter()
                .map(|step| {
                    level += step;
                    level
                })
                .collect();
        }
        out
    }

    pub fn summary(&self) -> String {
        let mut s = format!("{} Model Summary\n", self.order);
        s.push_str(&"=".repeat(40));
        s.push('\n');
        for (i, c) in self.ar_coeffs.iter().enumerate() {
            s.push_str(&format!("  ar.L{} = {:.6}\n", i + 1, c));
        }
        for (i, c) in self.ma_coeffs.iter().enumerate() {
            s.push_str(&format!("  ma.L{} = {:.6}\n", i + 1, c));
        }
        if self.order.d == 0 {
            s.push_str(&format!("Mean: {:.6}\n", self.mean));
        }
        s.push_str(&format!("Sigma2: {:.6}\n", self.sigma2));
        s.push_str(&format!("Log likelihood: {:.3}\n", self.log_likelihood));
        s.push_str(&format!("AIC: {:.2}\n", self.aic));
        s.push_str(&format!("BIC: {:.2}\n", self.bic));
        s.push_str(&format!("Iterations: {}\n", self.iterations));
        s
    }
}

/// Difference a series `d` times.
pub fn difference(data: &[f64], d: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..d {
        if result.len() < 2 {
            return vec![];
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

fn is_constant(data: &[f64]) -> bool {
    data.windows(2).all(|w| w[0] == w[1])
}

/// One-step residuals `e[t] = z[t] - Σφ z[t-i] - Σθ e[t-j]`, zero for `t < p`.
fn css_residuals(z: &[f64], phi: &[f64], theta: &[f64]) -> Vec<f64> {
    let p = phi.len();
    let mut e = vec![0.0; z.len()];
    for t in p..z.len() {
        let mut pred = 0.0;
        for (i, a) in phi.iter().enumerate() {
            pred += a * z[t - 1 - i];
        }
        for (j, b) in theta.iter().enumerate() {
            if t > j {
                pred += b * e[t - 1 - j];
            }
        }
        e[t] = z[t] - pred;
    }
    e
}

/// Mean squared one-step residual.
fn conditional_sum_of_squares(z: &[f64], phi: &[f64], theta: &[f64]) -> f64 {
    let p = phi.len();
    let e = css_residuals(z, phi, theta);
    e[p..].iter().map(|v| v * v).sum::<f64>() / (z.len() - p) as f64
}

/// Map unconstrained reals to the coefficients of a stationary AR polynomial
/// `x[t] = Σ φ[i] x[t-1-i]` via partial autocorrelations in (-1, 1).
fn constrain_stationary(u: &[f64]) -> Vec<f64> {
    let mut phi: Vec<f64> = Vec::with_capacity(u.len());
    for &x in u {
        let r = x / (1.0 + x * x).sqrt();
        let k = phi.len();
        let prev = phi.clone();
        for i in 0..k {
            phi[i] = prev[i] - r * prev[k - 1 - i];
        }
        phi.push(r);
    }
    phi
}

/// Inverse of [`constrain_stationary`]; `None` if `phi` is not stationary.
fn unconstrain_stationary(phi: &[f64]) -> Option<Vec<f64>> {
    let mut cur = phi.to_vec();
    let mut u = vec![0.0; phi.len()];
    for k in (0..phi.len()).rev() {
        let r = cur[k];
        if !r.is_finite() || r.abs() >= 1.0 {
            return None;
        }
        let denom = 1.0 - r * r;
        u[k] = r / denom.sqrt();
        cur = (0..k).map(|i| (cur[i] + r * cur[k - 1 - i]) / denom).collect();
    }
    Some(u)
}

fn from_unconstrained(params: &[f64], p: usize) -> (Vec<f64>, Vec<f64>) {
    let phi = constrain_stationary(&params[..p]);
    // 1 + Σθ L^j is invertible exactly when 1 - Σ(-θ) L^j is stationary.
    let theta = constrain_stationary(&params[p..])
        .into_iter()
        .map(|v| -v)
        .collect();
    (phi, theta)
}

fn to_unconstrained(phi: &[f64], theta: &[f64]) -> Vec<f64> {
    let mut params = unconstrain_stationary(phi).unwrap_or_else(|| vec![0.0; phi.len()]);
    let neg_theta: Vec<f64> = theta.iter().map(|v| -v).collect();
    params.extend(unconstrain_stationary(&neg_theta).unwrap_or_else(|| vec![0.0; theta.len()]));
    params
}

/// Ordinary least squares on row-major regressors.
fn least_squares(x_data: &[f64], y: Vec<f64>, cols: usize) -> Option<Vec<f64>> {
    let rows = y.len();
    if cols == 0 || rows <= cols {
        return None;
    }
    let x = DMatrix::from_row_slice(rows, cols, x_data);
    let y = DVector::from_vec(y);
    let xtx = x.transpose() * &x;
    let xty = x.transpose() * y;
    let beta = xtx.try_inverse()? * xty;
    if beta.iter().all(|b| b.is_finite()) {
        Some(beta.iter().copied().collect())
    } else {
        None
    }
}

/// Two-stage Hannan–Rissanen starting values for an ARMA(p, q) on `z`.
fn hannan_rissanen(z: &[f64], p: usize, q: usize) -> Option<(Vec<f64>, Vec<f64>)> {
    let n = z.len();

    // Stage 1: long autoregression supplies innovation proxies for the MA part.
    let mut innovations = vec![0.0; n];
    let m = if q > 0 {
        let m = (p + q).max(10).min(n / 4);
        if m == 0 {
            return None;
        }
        let mut x_data = Vec::with_capacity((n - m) * m);
        let mut y = Vec::with_capacity(n - m);
        for t in m..n {
            y.push(z[t]);
            x_data.extend((1..=m).map(|i| z[t - i]));
        }
        let long_ar = least_squares(&x_data, y, m)?;
        for t in m..n {
            let fitted: f64 = long_ar.iter().enumerate().map(|(i, a)| a * z[t - 1 - i]).sum();
            innovations[t] = z[t] - fitted;
        }
        m
    } else {
        0
    };

    // Stage 2: regress on lagged values and lagged innovation proxies.
    let start = (m + q).max(p);
    if start >= n {
        return None;
    }
    let cols = p + q;
    let mut x_data = Vec::with_capacity((n - start) * cols);
    let mut y = Vec::with_capacity(n - start);
    for t in start..n {
        y.push(z[t]);
        x_data.extend((1..=p).map(|i| z[t - i]));
        x_data.extend((1..=q).map(|j| innovations[t - j]));
    }
    let beta = least_squares(&x_data, y, cols)?;
    Some((beta[..p].to_vec(), beta[p..].to_vec()))
}
