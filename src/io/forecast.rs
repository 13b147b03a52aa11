//! Read/write forecast JSON files.
//!
//! Forecast JSON is the portable representation of one run:
//! - which target was forecast and over which horizon
//! - per-category fit parameters (intercept, coefficients, rmse)
//! - the predicted points themselves
//!
//! The schema is defined by `domain::ForecastFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{ForecastFile, ForecastSeries, Horizon, Target};
use crate::error::AppError;

/// Assemble the JSON document for a run.
pub fn forecast_file(target: Target, horizon: &Horizon, series: &[ForecastSeries]) -> ForecastFile {
    ForecastFile {
        tool: "coffee".to_string(),
        target,
        horizon: horizon.years(),
        series: series.to_vec(),
    }
}

/// Write a forecast JSON file.
pub fn write_forecast_json(
    path: &Path,
    target: Target,
    horizon: &Horizon,
    series: &[ForecastSeries],
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create forecast JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &forecast_file(target, horizon, series))
        .map_err(|e| AppError::input(format!("Failed to write forecast JSON: {e}")))?;

    Ok(())
}

/// Read a forecast JSON file.
pub fn read_forecast_json(path: &Path) -> Result<ForecastFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open forecast JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid forecast JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastPoint, LinearFit};

    #[test]
    fn written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forecast.json");
        let series = vec![ForecastSeries {
            category: "Latte".to_string(),
            category_id: 1,
            points: Horizon::DEFAULT
                .years()
                .into_iter()
                .map(|year| ForecastPoint { year, value: 1.0 })
                .collect(),
            fit: LinearFit {
                intercept: 1.0,
                coefficients: vec![0.0],
                n: 2,
                rmse: 0.0,
            },
        }];

        write_forecast_json(&path, Target::Transactions, &Horizon::DEFAULT, &series).unwrap();
        let back = read_forecast_json(&path).unwrap();

        assert_eq!(back.tool, "coffee");
        assert_eq!(back.target, Target::Transactions);
        assert_eq!(back.horizon, vec![2024, 2025, 2026, 2027, 2028]);
        assert_eq!(back.series, series);
    }

    #[test]
    fn target_serializes_lowercase() {
        let doc = forecast_file(Target::Revenue, &Horizon::DEFAULT, &[]);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["target"], "revenue");
    }
}
