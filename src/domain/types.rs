//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between pipeline stages without shared mutable state
//! - exported to JSON/CSV
//! - handed to either renderer unchanged

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which quantity a run forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Yearly transaction counts per category, fitted on `[year]`.
    Transactions,
    /// Individual sale amounts per category, fitted on `[hour, day_of_week, category_id, year]`.
    Revenue,
}

impl Target {
    /// Chart title used by every renderer.
    pub fn title(self) -> &'static str {
        match self {
            Target::Transactions => "Sales Forecast by Coffee Type (Number of Transactions)",
            Target::Revenue => "Sales Forecast by Coffee Type",
        }
    }

    /// Y-axis label.
    pub fn y_label(self) -> &'static str {
        match self {
            Target::Transactions => "Predicted Number of Sales",
            Target::Revenue => "Predicted Sales ($)",
        }
    }
}

/// The fixed window of years every category is extrapolated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    pub first: i32,
    pub last: i32,
}

impl Horizon {
    pub const DEFAULT: Horizon = Horizon {
        first: 2024,
        last: 2028,
    };

    /// Years in ascending order, both ends inclusive.
    pub fn years(&self) -> Vec<i32> {
        (self.first..=self.last).collect()
    }

    pub fn len(&self) -> usize {
        (self.last - self.first + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A single point-of-sale row after timestamp parsing.
///
/// `amount` is `None` when the file has no `money` column or the cell is
/// blank or not a number.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub timestamp: NaiveDateTime,
    pub category: String,
    pub amount: Option<f64>,
}

/// A sale with its calendar features and category id attached.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSale {
    pub category: String,
    pub category_id: u32,
    pub year: i32,
    /// Monday = 0 … Sunday = 6.
    pub day_of_week: u32,
    /// Source data has no time of day; every sale is placed at noon.
    pub hour: u32,
    pub amount: Option<f64>,
}

/// Number of sales for one (category, year) pair with at least one sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyCount {
    pub category: String,
    pub year: i32,
    pub count: usize,
}

/// Result of one ordinary least-squares fit.
///
/// `coefficients` follow the column order of the feature matrix that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Number of observations used.
    pub n: usize,
    /// Root mean squared in-sample residual.
    pub rmse: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub year: i32,
    pub value: f64,
}

/// Forecast for one category over the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub category: String,
    pub category_id: u32,
    pub points: Vec<ForecastPoint>,
    pub fit: LinearFit,
}

impl ForecastSeries {
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// `(year, value)` pairs as floats, the shape the chart backends want.
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.year as f64, p.value)).collect()
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub csv_path: PathBuf,
    pub target: Target,
    pub horizon: Horizon,

    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl ForecastConfig {
    pub fn new(csv_path: impl Into<PathBuf>, target: Target) -> Self {
        Self {
            csv_path: csv_path.into(),
            target,
            horizon: Horizon::DEFAULT,
            plot_width: 80,
            plot_height: 20,
            export_csv: None,
            export_json: None,
        }
    }
}

/// A saved forecast file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastFile {
    pub tool: String,
    pub target: Target,
    pub horizon: Vec<i32>,
    pub series: Vec<ForecastSeries>,
}
