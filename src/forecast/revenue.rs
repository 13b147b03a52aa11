//! Revenue forecasts over individual sales.
//!
//! Each category gets its own fit of
//!
//! ```text
//! amount ≈ β0 + β1·hour + β2·day_of_week + β3·category_id + β4·year
//! ```
//!
//! over every sale of that category. `hour` and `category_id` are constant
//! within a category, so they contribute nothing to the fit. Predictions are
//! taken at `hour = 12`, `day_of_week = 2` (Wednesday) and the category's own id.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::{ForecastSeries, Horizon};
use crate::error::AppError;
use crate::features::{ASSUMED_HOUR, DerivedSales};
use crate::math::fit_linear;

/// Weekday the revenue forecasts are evaluated at (Monday = 0).
pub const FORECAST_DAY_OF_WEEK: u32 = 2;

/// Column order of the revenue design matrix.
pub const REVENUE_FEATURES: [&str; 4] = ["hour", "day_of_week", "category_id", "year"];

/// Fit and extrapolate one revenue model per category, in category-id order.
pub fn forecast_revenue(derived: &DerivedSales, horizon: &Horizon) -> Result<Vec<ForecastSeries>, AppError> {
    let mut out = Vec::with_capacity(derived.categories.len());

    for (category_id, category) in derived.categories.iter() {
        let mut rows: Vec<f64> = Vec::new();
        let mut target: Vec<f64> = Vec::new();
        for sale in derived.for_category(category_id) {
            let amount = sale.amount.ok_or_else(|| {
                AppError::input(format!("Sale of '{category}' has no amount; revenue needs `money`."))
            })?;
            rows.extend_from_slice(&[
                sale.hour as f64,
                sale.day_of_week as f64,
                sale.category_id as f64,
                sale.year as f64,
            ]);
            target.push(amount);
        }

        if target.is_empty() {
            return Err(AppError::runtime(format!("Category '{category}' has no sales to fit.")));
        }

        let x = DMatrix::from_row_slice(target.len(), REVENUE_FEATURES.len(), &rows);
        let y = DVector::from_vec(target);
        let fit = fit_linear(&x, &y)?;
        debug!(
            category = %category,
            n = fit.n,
            intercept = fit.intercept,
            coefficients = ?fit.coefficients,
            "fitted revenue model"
        );

        let id = category_id as f64;
        let points = super::project(category, &fit, horizon, |year| {
            vec![ASSUMED_HOUR as f64, FORECAST_DAY_OF_WEEK as f64, id, year as f64]
        })?;

        out.push(ForecastSeries {
            category: category.to_string(),
            category_id,
            points,
            fit,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::SaleRecord;
    use crate::features::derive_features;
    use crate::io::ingest::LoadedSales;

    fn sale(date: &str, category: &str, amount: f64) -> SaleRecord {
        SaleRecord {
            timestamp: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            category: category.to_string(),
            amount: Some(amount),
        }
    }

    fn derived(records: Vec<SaleRecord>) -> DerivedSales {
        derive_features(&LoadedSales {
            rows_read: records.len(),
            records,
            has_amounts: true,
            dropped: Vec::new(),
            bad_amounts: Vec::new(),
        })
    }

    #[test]
    fn one_series_per_category_with_ids() {
        let d = derived(vec![
            sale("2022-01-03", "Latte", 3.5),
            sale("2023-01-03", "Latte", 4.5),
            sale("2022-06-01", "Espresso", 2.0),
        ]);
        let series = forecast_revenue(&d, &Horizon::DEFAULT).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!((series[0].category.as_str(), series[0].category_id), ("Espresso", 1));
        assert_eq!((series[1].category.as_str(), series[1].category_id), ("Latte", 2));
        for s in &series {
            assert_eq!(s.points.len(), 5);
            assert_eq!(s.fit.coefficients.len(), REVENUE_FEATURES.len());
        }
        assert!(series[0].values().all(|v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn yearly_price_drift_is_extrapolated() {
        // Weekdays shift by one each year; amounts depend on the year only.
        let d = derived(vec![
            sale("2021-03-01", "Cortado", 3.0),
            sale("2021-03-02", "Cortado", 3.0),
            sale("2022-03-01", "Cortado", 4.0),
            sale("2022-03-02", "Cortado", 4.0),
            sale("2023-03-01", "Cortado", 5.0),
            sale("2023-03-02", "Cortado", 5.0),
        ]);
        let series = forecast_revenue(&d, &Horizon::DEFAULT).unwrap();
        let values: Vec<f64> = series[0].values().collect();
        for pair in values.windows(2) {
            assert!((pair[1] - pair[0] - 1.0).abs() < 1e-8, "{values:?}");
        }
        assert_eq!(series[0].fit.coefficients[0], 0.0);
        assert_eq!(series[0].fit.coefficients[2], 0.0);
    }

    #[test]
    fn other_categories_do_not_leak_into_a_fit() {
        let base = vec![
            sale("2022-01-03", "Mocha", 3.0),
            sale("2023-01-04", "Mocha", 3.5),
            sale("2023-01-05", "Mocha", 3.7),
            sale("2022-01-03", "Tea", 1.0),
        ];
        let mut changed = base.clone();
        changed[3].amount = Some(99.0);
        changed.push(sale("2021-02-02", "Tea", 0.5));

        let a = forecast_revenue(&derived(base), &Horizon::DEFAULT).unwrap();
        let b = forecast_revenue(&derived(changed), &Horizon::DEFAULT).unwrap();
        assert_eq!(a[0].category, "Mocha");
        assert_eq!(a[0].points, b[0].points);
    }

    #[test]
    fn missing_amount_is_an_input_error() {
        let mut records = vec![sale("2022-01-03", "Latte", 1.0)];
        records[0].amount = None;
        let err = forecast_revenue(&derived(records), &Horizon::DEFAULT).unwrap_err();
        assert_eq!(err.exit_code(), AppError::INPUT);
    }
}
