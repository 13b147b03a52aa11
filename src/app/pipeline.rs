//! Shared forecast pipeline used by every front-end (chart, dashboard, report).
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> derive features -> (aggregate) -> forecast per category
//!
//! The front-ends can then focus on presentation.

use tracing::info;

use crate::aggregate::yearly_counts;
use crate::domain::{ForecastConfig, ForecastSeries, Horizon, Target, YearlyCount};
use crate::error::AppError;
use crate::features::{CategoryIndex, derive_features};
use crate::forecast::{forecast_revenue, forecast_transactions};
use crate::io::ingest::{LoadedSales, load_sales};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub target: Target,
    pub horizon: Horizon,
    pub loaded: LoadedSales,
    pub categories: CategoryIndex,
    /// Yearly counts; only filled for `Target::Transactions`.
    pub counts: Vec<YearlyCount>,
    pub series: Vec<ForecastSeries>,
}

/// Load the configured CSV and run the forecast for the configured target.
pub fn run_forecast(config: &ForecastConfig) -> Result<RunOutput, AppError> {
    let loaded = load_sales(&config.csv_path)?;
    run_forecast_with_sales(config.target, &config.horizon, loaded)
}

/// Run the forecast on records that are already loaded.
pub fn run_forecast_with_sales(
    target: Target,
    horizon: &Horizon,
    loaded: LoadedSales,
) -> Result<RunOutput, AppError> {
    if target == Target::Revenue {
        loaded.require_amounts()?;
    }

    let derived = derive_features(&loaded);

    let (counts, series) = match target {
        Target::Transactions => {
            let counts = yearly_counts(&derived);
            let series = forecast_transactions(&counts, &derived.categories, horizon)?;
            (counts, series)
        }
        Target::Revenue => (Vec::new(), forecast_revenue(&derived, horizon)?),
    };

    info!(
        target = ?target,
        categories = derived.categories.len(),
        series = series.len(),
        "forecast complete"
    );

    Ok(RunOutput {
        target,
        horizon: *horizon,
        loaded,
        categories: derived.categories,
        counts,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_sales;

    const SCENARIO: &str = "date,coffee_name,money\n\
                            2022-01-01,Latte,3.5\n\
                            2023-01-01,Latte,3.5\n\
                            2022-06-01,Espresso,2.0\n";

    #[test]
    fn transactions_end_to_end() {
        let loaded = read_sales(SCENARIO.as_bytes()).unwrap();
        let run = run_forecast_with_sales(Target::Transactions, &Horizon::DEFAULT, loaded).unwrap();

        let counts: Vec<_> = run
            .counts
            .iter()
            .map(|c| (c.category.as_str(), c.year, c.count))
            .collect();
        assert_eq!(
            counts,
            vec![("Espresso", 2022, 1), ("Latte", 2022, 1), ("Latte", 2023, 1)]
        );

        assert_eq!(run.series.len(), 2);
        for s in &run.series {
            let years: Vec<_> = s.points.iter().map(|p| p.year).collect();
            assert_eq!(years, vec![2024, 2025, 2026, 2027, 2028]);
            for v in s.values() {
                assert!((v - 1.0).abs() < 1e-9, "{}: {v}", s.category);
            }
        }
        let latte = run.series.iter().find(|s| s.category == "Latte").unwrap();
        assert!(latte.fit.coefficients[0].abs() < 1e-9);
    }

    #[test]
    fn revenue_end_to_end() {
        let loaded = read_sales(SCENARIO.as_bytes()).unwrap();
        let run = run_forecast_with_sales(Target::Revenue, &Horizon::DEFAULT, loaded).unwrap();

        assert!(run.counts.is_empty());
        assert_eq!(run.series.len(), run.categories.len());
        for s in &run.series {
            assert_eq!(s.points.len(), 5);
        }
        let espresso = &run.series[0];
        assert_eq!(espresso.category, "Espresso");
        assert!(espresso.values().all(|v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn blank_amount_only_blocks_revenue() {
        let csv = "date,coffee_name,money\n\
                   2022-01-01,Latte,3.5\n\
                   2023-01-01,Latte,\n\
                   2022-06-01,Espresso,2.0\n";

        let run = run_forecast_with_sales(
            Target::Transactions,
            &Horizon::DEFAULT,
            read_sales(csv.as_bytes()).unwrap(),
        )
        .unwrap();
        assert_eq!(run.series.len(), 2);
        assert!(run.series.iter().all(|s| s.values().all(|v| (v - 1.0).abs() < 1e-9)));

        let err = run_forecast_with_sales(Target::Revenue, &Horizon::DEFAULT, read_sales(csv.as_bytes()).unwrap())
            .unwrap_err();
        assert_eq!(err.exit_code(), AppError::INPUT);
        assert!(err.message().contains("Line 3"), "{}", err.message());
    }

    #[test]
    fn revenue_requires_money_column() {
        let loaded = read_sales("date,coffee_name\n2022-01-01,Latte\n".as_bytes()).unwrap();
        let err = run_forecast_with_sales(Target::Revenue, &Horizon::DEFAULT, loaded).unwrap_err();
        assert_eq!(err.exit_code(), AppError::INPUT);
    }

    #[test]
    fn missing_csv_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = ForecastConfig::new(dir.path().join("coffee_sales.csv"), Target::Transactions);
        let err = run_forecast(&config).unwrap_err();
        assert_eq!(err.exit_code(), AppError::INPUT);
    }
}
