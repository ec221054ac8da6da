//! Derivative-free Nelder–Mead simplex minimiser.
//!
//! Convergence test is the relative spread of function values across the
//! simplex (Numerical Recipes `amoeba` criterion), so flat ridges where AR and
//! MA roots nearly cancel still terminate.

/// Tuning for [`minimize`].
#[derive(Debug, Clone, Copy)]
pub struct NelderMeadOptions {
    pub ftol: f64,
    pub max_iter: usize,
    /// Initial simplex offset for a coordinate that starts at exactly zero.
    pub zero_step: f64,
    /// Relative initial simplex offset for a nonzero coordinate.
    pub rel_step: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            ftol: 1e-10,
            max_iter: 2_000,
            zero_step: 0.05,
            rel_step: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

const ALPHA: f64 = 1.0; // reflection
const GAMMA: f64 = 2.0; // expansion
const RHO: f64 = 0.5; // contraction
const SIGMA: f64 = 0.5; // shrink
const TINY: f64 = 1e-30;

/// Minimise `f` starting from `x0`.
///
/// Non-finite objective values are treated as +inf so the simplex retreats
/// from regions where the objective blows up.
pub fn minimize<F>(f: F, x0: &[f64], opts: &NelderMeadOptions) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let eval = |x: &[f64]| {
        let v = f(x);
        if v.is_finite() {
            v
        } else {
            f64::INFINITY
        }
    };

    let n = x0.len();
    if n == 0 {
        return Minimum {
            x: Vec::new(),
            value: eval(x0),
            iterations: 0,
            converged: true,
        };
    }

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(x0.to_vec());
    for i in 0..n {
        let mut vertex = x0.to_vec();
        vertex[i] = if vertex[i] == 0.0 {
            opts.zero_step
        } else {
            vertex[i] * (1.0 + opts.rel_step)
        };
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    loop {
        // Order vertices best to worst.
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let best = values[0];
        let worst = values[n];
        let spread = 2.0 * (worst - best).abs() / (worst.abs() + best.abs() + TINY);
        if best.is_finite() && worst.is_finite() && spread <= opts.ftol {
            return Minimum {
                x: simplex.swap_remove(0),
                value: best,
                iterations,
                converged: true,
            };
        }
        if iterations >= opts.max_iter {
            return Minimum {
                x: simplex.swap_remove(0),
                value: best,
                iterations,
                converged: false,
            };
        }
        iterations += 1;

        let centroid: Vec<f64> = (0..n)
            .map(|j| simplex[..n].iter().map(|v| v[j]).sum::<f64>() / n as f64)
            .collect();
        let along = |coef: f64| -> Vec<f64> {
            centroid
                .iter()
                .zip(&simplex[n])
                .map(|(c, w)| c + coef * (c - w))
                .collect()
        };

        let reflected = along(ALPHA);
        let f_reflected = eval(&reflected);

        if f_reflected < values[0] {
            let expanded = along(GAMMA);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                simplex[n] = expanded;
                values[n] = f_expanded;
            } else {
                simplex[n] = reflected;
                values[n] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[n - 1] {
            simplex[n] = reflected;
            values[n] = f_reflected;
            continue;
        }

        let (contracted, f_contracted) = if f_reflected < values[n] {
            let c = along(RHO);
            let fc = eval(&c);
            (c, fc)
        } else {
            let c = along(-RHO);
            let fc = eval(&c);
            (c, fc)
        };
        if f_contracted < values[n].min(f_reflected) {
            simplex[n] = contracted;
            values[n] = f_contracted;
            continue;
        }

        // Shrink toward the best vertex.
        let best_vertex = simplex[0].clone();
        for i in 1..=n {
            for j in 0..n {
                simplex[i][j] = best_vertex[j] + SIGMA * (simplex[i][j] - best_vertex[j]);
            }
            values[i] = eval(&simplex[i]);
        }
    }
}
