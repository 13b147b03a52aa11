//! Export forecast series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! one row per (category, year) point.

use std::fs::File;
use std::path::Path;

use crate::domain::ForecastSeries;
use crate::error::AppError;

/// Write forecast points to a CSV file.
pub fn write_forecast_csv(path: &Path, series: &[ForecastSeries]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_forecast_rows(file, series)
}

pub(crate) fn write_forecast_rows<W: std::io::Write>(out: W, series: &[ForecastSeries]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);

    writer
        .write_record(["category", "category_id", "year", "predicted"])
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for s in series {
        for p in &s.points {
            writer
                .write_record([
                    s.category.clone(),
                    s.category_id.to_string(),
                    p.year.to_string(),
                    format!("{:.6}", p.value),
                ])
                .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
