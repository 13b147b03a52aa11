//! Transaction-count forecasts: `count ≈ β0 + β1 · year` per category.

use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::{ForecastSeries, Horizon, YearlyCount};
use crate::error::AppError;
use crate::features::CategoryIndex;
use crate::math::fit_linear;

/// Fit a line through each category's yearly counts and extrapolate it.
///
/// A category observed in a single year yields a flat line at that year's count.
/// Series come back in category-id order.
pub fn forecast_transactions(
    counts: &[YearlyCount],
    categories: &CategoryIndex,
    horizon: &Horizon,
) -> Result<Vec<ForecastSeries>, AppError> {
    let mut by_category: BTreeMap<u32, Vec<&YearlyCount>> = BTreeMap::new();
    for c in counts {
        let id = categories.id_of(&c.category).ok_or_else(|| {
            AppError::runtime(format!("Category '{}' is missing from the category index.", c.category))
        })?;
        by_category.entry(id).or_default().push(c);
    }

    let mut out = Vec::with_capacity(by_category.len());
    for (category_id, rows) in by_category {
        let category = categories
            .label_of(category_id)
            .map(str::to_string)
            .unwrap_or_else(|| rows[0].category.clone());

        let years: Vec<f64> = rows.iter().map(|r| r.year as f64).collect();
        let target: Vec<f64> = rows.iter().map(|r| r.count as f64).collect();
        let x = DMatrix::from_column_slice(rows.len(), 1, &years);
        let y = DVector::from_vec(target);

        let fit = fit_linear(&x, &y)?;
        debug!(
            category = %category,
            n = fit.n,
            intercept = fit.intercept,
            slope = fit.coefficients[0],
            "fitted transaction trend"
        );

        let points = super::project(&category, &fit, horizon, |year| vec![year as f64])?;
        out.push(ForecastSeries {
            category,
            category_id,
            points,
            fit,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(category: &str, year: i32, count: usize) -> YearlyCount {
        YearlyCount {
            category: category.to_string(),
            year,
            count,
        }
    }

    fn index(counts: &[YearlyCount]) -> CategoryIndex {
        CategoryIndex::from_labels(counts.iter().map(|c| c.category.as_str()))
    }

    #[test]
    fn one_series_per_category_over_the_horizon() {
        let counts = vec![
            count("Latte", 2022, 5),
            count("Latte", 2023, 7),
            count("Cocoa", 2021, 2),
            count("Cortado", 2023, 1),
        ];
        let series = forecast_transactions(&counts, &index(&counts), &Horizon::DEFAULT).unwrap();

        let names: Vec<_> = series.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Cocoa", "Cortado", "Latte"]);
        for s in &series {
            let years: Vec<_> = s.points.iter().map(|p| p.year).collect();
            assert_eq!(years, vec![2024, 2025, 2026, 2027, 2028]);
        }
    }

    #[test]
    fn single_year_gives_flat_line() {
        let counts = vec![count("Espresso", 2022, 4)];
        let series = forecast_transactions(&counts, &index(&counts), &Horizon::DEFAULT).unwrap();
        assert!(series[0].values().all(|v| v == 4.0));
    }

    #[test]
    fn constant_step_is_extrapolated() {
        let counts = vec![
            count("Americano", 2020, 10),
            count("Americano", 2021, 13),
            count("Americano", 2022, 16),
            count("Americano", 2023, 19),
        ];
        let series = forecast_transactions(&counts, &index(&counts), &Horizon::DEFAULT).unwrap();
        let values: Vec<f64> = series[0].values().collect();
        for pair in values.windows(2) {
            assert!((pair[1] - pair[0] - 3.0).abs() < 1e-8, "{values:?}");
        }
        assert!((values[0] - 22.0).abs() < 1e-7);
    }

    #[test]
    fn declining_trend_may_go_negative() {
        let counts = vec![
            count("Cocoa", 2021, 6),
            count("Cocoa", 2022, 4),
            count("Cocoa", 2023, 2),
        ];
        let series = forecast_transactions(&counts, &index(&counts), &Horizon::DEFAULT).unwrap();
        let last = series[0].points.last().unwrap();
        assert_eq!(last.year, 2028);
        assert!((last.value - -8.0).abs() < 1e-7);
    }

    #[test]
    fn categories_do_not_influence_each_other() {
        let base = vec![
            count("Latte", 2021, 3),
            count("Latte", 2023, 9),
            count("Mocha", 2022, 1),
        ];
        let mut changed = base.clone();
        changed[2].count = 500;
        changed.push(count("Mocha", 2023, 2));

        let a = forecast_transactions(&base, &index(&base), &Horizon::DEFAULT).unwrap();
        let b = forecast_transactions(&changed, &index(&changed), &Horizon::DEFAULT).unwrap();
        assert_eq!(a[0].category, "Latte");
        assert_eq!(a[0].fit, b[0].fit);
        assert_eq!(a[0].points, b[0].points);
    }

    #[test]
    fn rerun_is_deterministic() {
        let counts = vec![count("Latte", 2019, 3), count("Latte", 2020, 8), count("Latte", 2023, 4)];
        let idx = index(&counts);
        let a = forecast_transactions(&counts, &idx, &Horizon::DEFAULT).unwrap();
        let b = forecast_transactions(&counts, &idx, &Horizon::DEFAULT).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_category_is_an_error() {
        let counts = vec![count("Latte", 2022, 1)];
        let err = forecast_transactions(&counts, &CategoryIndex::default(), &Horizon::DEFAULT).unwrap_err();
        assert_eq!(err.exit_code(), AppError::RUNTIME);
    }
}
