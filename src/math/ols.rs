//! Ordinary least squares with an intercept.
//!
//! Every forecast in this crate is a small linear regression of the form:
//!
//! ```text
//! minimize Σ (y_i - β0 - x_i^T β)^2
//! ```
//!
//! solved independently per category.
//!
//! Implementation choices:
//! - Columns and target are centred first; the intercept is recovered as
//!   `ȳ - x̄ᵀβ`. Centring turns constant columns into exact zeros, so they are
//!   dropped before solving and get a zero coefficient.
//! - The centred system is solved with SVD, taking the minimum-norm solution.
//!   Singular values below `σ_max · max(n, p) · ε` are treated as zero, so
//!   rank-deficient designs (one observation, collinear columns) degrade to the
//!   flattest fit instead of failing.
//! - Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices, which is why SVD is used even for tall designs.

use nalgebra::{DMatrix, DVector};

use crate::domain::LinearFit;
use crate::error::AppError;

/// Solve a least squares problem using SVD (minimum-norm solution).
///
/// Returns `None` if the solve produced non-finite coefficients.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let tol = sigma_max * x.nrows().max(x.ncols()) as f64 * f64::EPSILON;

    let beta = svd.solve(y, tol).ok()?;
    if beta.iter().all(|v| v.is_finite()) {
        Some(beta)
    } else {
        None
    }
}

/// Fit `target ≈ intercept + features · coefficients`.
///
/// `features` is `n × p` (one row per observation). The returned fit has one
/// coefficient per column of `features`.
pub fn fit_linear(features: &DMatrix<f64>, target: &DVector<f64>) -> Result<LinearFit, AppError> {
    let n = features.nrows();
    let p = features.ncols();

    if n == 0 {
        return Err(AppError::empty("Cannot fit a linear model on zero observations."));
    }
    if target.len() != n {
        return Err(AppError::runtime(format!(
            "Feature rows ({n}) and target length ({}) differ.",
            target.len()
        )));
    }

    let x_mean: Vec<f64> = (0..p).map(|j| features.column(j).mean()).collect();
    let y_mean = target.mean();

    // Constant columns centre to exactly zero and carry no information.
    let varying: Vec<usize> = (0..p)
        .filter(|&j| features.column(j).iter().any(|&v| v != x_mean[j]))
        .collect();

    let mut coefficients = vec![0.0; p];
    if !varying.is_empty() {
        let xc = DMatrix::from_fn(n, varying.len(), |i, k| {
            let j = varying[k];
            features[(i, j)] - x_mean[j]
        });
        let yc = target.map(|v| v - y_mean);

        let beta = solve_least_squares(&xc, &yc)
            .ok_or_else(|| AppError::runtime("Least-squares solve produced non-finite coefficients."))?;
        for (k, &j) in varying.iter().enumerate() {
            coefficients[j] = beta[k];
        }
    }

    let intercept = y_mean
        - coefficients
            .iter()
            .zip(&x_mean)
            .map(|(b, m)| b * m)
            .sum::<f64>();

    if !intercept.is_finite() {
        return Err(AppError::runtime("Least-squares fit produced a non-finite intercept."));
    }

    let mut sse = 0.0;
    for i in 0..n {
        let fitted = intercept
            + coefficients
                .iter()
                .enumerate()
                .map(|(j, b)| b * features[(i, j)])
                .sum::<f64>();
        let r = target[i] - fitted;
        sse += r * r;
    }

    Ok(LinearFit {
        intercept,
        coefficients,
        n,
        rmse: (sse / n as f64).sqrt(),
    })
}

impl LinearFit {
    /// Evaluate the fitted function at one feature row.
    ///
    /// Extra or missing entries in `row` are ignored/treated as zero.
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(b, x)| b * x)
                .sum::<f64>()
    }
}
