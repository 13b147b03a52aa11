//! Per-category forecasting.
//!
//! Responsibilities:
//!
//! - split the data by category (no row ever crosses into another category's fit)
//! - fit one least-squares model per category (`math::fit_linear`)
//! - evaluate each fit over the horizon years
//!
//! Two targets share this shape: yearly transaction counts (`transactions`) and
//! individual sale amounts (`revenue`).

pub mod revenue;
pub mod transactions;

pub use revenue::*;
pub use transactions::*;

use crate::domain::{ForecastPoint, Horizon, LinearFit};
use crate::error::AppError;

/// Evaluate `fit` at the feature row built for each horizon year.
pub(crate) fn project<F>(
    category: &str,
    fit: &LinearFit,
    horizon: &Horizon,
    row_for_year: F,
) -> Result<Vec<ForecastPoint>, AppError>
where
    F: Fn(i32) -> Vec<f64>,
{
    horizon
        .years()
        .into_iter()
        .map(|year| {
            let value = fit.predict(&row_for_year(year));
            if value.is_finite() {
                Ok(ForecastPoint { year, value })
            } else {
                Err(AppError::runtime(format!(
                    "Non-finite prediction for '{category}' in {year}."
                )))
            }
        })
        .collect()
}
