//! CSV ingest for point-of-sale records.
//!
//! This module is responsible for turning a coffee-sales CSV into a clean list of
//! `SaleRecord`s with parsed timestamps.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level tolerance** for timestamps: unparseable dates drop the row and are
//!   counted, never repaired
//! - **Deferred amounts**: a blank or non-numeric `money` cell is recorded, and only
//!   becomes fatal when a revenue forecast asks for amounts
//! - **Fatal decode errors**: a row the CSV reader cannot decode aborts the load
//! - **Separation of concerns**: no feature derivation or fitting here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::SaleRecord;
use crate::error::AppError;

const DATE_COLUMN: &str = "date";
const CATEGORY_COLUMN: &str = "coffee_name";
const AMOUNT_COLUMN: &str = "money";

/// A row that was read but not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed records + bookkeeping about what was skipped.
#[derive(Debug, Clone)]
pub struct LoadedSales {
    pub records: Vec<SaleRecord>,
    /// Whether the file carried a `money` column.
    pub has_amounts: bool,
    pub rows_read: usize,
    pub dropped: Vec<RowError>,
    /// Kept rows whose `money` cell is blank or not a number.
    pub bad_amounts: Vec<RowError>,
}

impl LoadedSales {
    pub fn rows_used(&self) -> usize {
        self.records.len()
    }

    /// Earliest and latest timestamp among kept rows.
    pub fn date_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.records.iter().map(|r| r.timestamp).min()?;
        let last = self.records.iter().map(|r| r.timestamp).max()?;
        Some((first, last))
    }

    /// Fail unless every kept row carries a sale amount.
    pub fn require_amounts(&self) -> Result<(), AppError> {
        if !self.has_amounts {
            return Err(AppError::input(format!(
                "Missing required column for revenue forecasts: `{AMOUNT_COLUMN}`"
            )));
        }
        if let Some(bad) = self.bad_amounts.first() {
            return Err(AppError::input(format!("Line {}: {}", bad.line, bad.message)));
        }
        Ok(())
    }
}

/// Load sale records from a CSV file on disk.
pub fn load_sales(path: &Path) -> Result<LoadedSales, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let loaded = read_sales(file)?;
    info!(
        path = %path.display(),
        rows_read = loaded.rows_read,
        rows_used = loaded.rows_used(),
        dropped = loaded.dropped.len(),
        "loaded sales"
    );
    Ok(loaded)
}

/// Load sale records from any CSV reader (headers required).
pub fn read_sales<R: Read>(reader: R) -> Result<LoadedSales, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    for required in [DATE_COLUMN, CATEGORY_COLUMN] {
        if !header_map.contains_key(required) {
            return Err(AppError::input(format!("Missing required column: `{required}`")));
        }
    }
    let has_amounts = header_map.contains_key(AMOUNT_COLUMN);

    let mut records = Vec::new();
    let mut dropped = Vec::new();
    let mut bad_amounts = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = result.map_err(|e| AppError::input(format!("Line {line}: CSV parse error: {e}")))?;

        let raw_date = get_optional(&record, &header_map, DATE_COLUMN).unwrap_or("");
        let Some(timestamp) = parse_timestamp(raw_date) else {
            debug!(line, value = raw_date, "dropping row with unparseable date");
            dropped.push(RowError {
                line,
                message: format!("Invalid date '{raw_date}'"),
            });
            continue;
        };

        let Some(category) = get_optional(&record, &header_map, CATEGORY_COLUMN) else {
            debug!(line, "dropping row without a category");
            dropped.push(RowError {
                line,
                message: format!("Missing value: `{CATEGORY_COLUMN}`"),
            });
            continue;
        };

        let amount = if has_amounts {
            match parse_amount(get_optional(&record, &header_map, AMOUNT_COLUMN)) {
                Ok(v) => Some(v),
                Err(message) => {
                    debug!(line, %message, "keeping row without a usable amount");
                    bad_amounts.push(RowError { line, message });
                    None
                }
            }
        } else {
            None
        };

        records.push(SaleRecord {
            timestamp,
            category: category.to_string(),
            amount,
        });
    }

    if records.is_empty() {
        return Err(AppError::empty(format!(
            "No valid rows remain after dropping {} of {rows_read} rows.",
            dropped.len()
        )));
    }

    Ok(LoadedSales {
        records,
        has_amounts,
        rows_read,
        dropped,
        bad_amounts,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a timestamp in one of the accepted layouts.
///
/// Date-only values are placed at midnight. Offsets in RFC 3339 input are
/// dropped and the local wall-clock time is kept.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    None
}

fn parse_amount(s: Option<&str>) -> Result<f64, String> {
    let s = s.ok_or_else(|| format!("Missing value: `{AMOUNT_COLUMN}`"))?;
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid amount '{s}' in `{AMOUNT_COLUMN}`"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite amount '{s}' in `{AMOUNT_COLUMN}`"))
    }
}
