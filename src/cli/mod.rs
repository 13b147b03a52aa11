//! Command-line parsing for the coffee sales forecaster.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! forecasting code. Every flag has a default, so a bare `coffee` run reads
//! `coffee_sales.csv` from the working directory and shows the chart.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Target;

pub const DEFAULT_CSV: &str = "coffee_sales.csv";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "coffee", version, about = "Coffee sales forecaster (per-category linear trends)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the forecast as a line chart in the terminal (blocks until `q`).
    Chart(ChartArgs),
    /// Serve the forecast as an interactive web page (blocks until Ctrl-C).
    Dashboard(DashboardArgs),
    /// Print the run summary, a forecast table and an ASCII plot; optionally export.
    Report(ReportArgs),
    /// Plot a previously exported forecast JSON.
    Plot(PlotArgs),
    /// Write a synthetic coffee-sales CSV.
    Generate(GenerateArgs),
}

/// Input options shared by every forecasting command.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Sales CSV with `date`, `coffee_name` and (for revenue) `money` columns.
    #[arg(long, env = "COFFEE_SALES_CSV", default_value = DEFAULT_CSV)]
    pub csv: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Quantity to forecast.
    #[arg(long, value_enum, default_value_t = Target::Transactions)]
    pub target: Target,
}

#[derive(Debug, Args, Clone)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Quantity to forecast.
    #[arg(long, value_enum, default_value_t = Target::Revenue)]
    pub target: Target,

    /// Address to bind.
    #[arg(long, env = "COFFEE_DASHBOARD_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "COFFEE_DASHBOARD_PORT", default_value_t = 8050)]
    pub port: u16,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Quantity to forecast.
    #[arg(long, value_enum, default_value_t = Target::Transactions)]
    pub target: Target,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export forecast points to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the forecast (fits + points) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting a saved forecast.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Forecast JSON file produced by `coffee report --export-json`.
    #[arg(long, value_name = "JSON")]
    pub forecast: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Output CSV path.
    #[arg(long, default_value = DEFAULT_CSV)]
    pub out: PathBuf,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First calendar year of generated sales.
    #[arg(long, default_value_t = 2019)]
    pub start_year: i32,

    /// Number of years to generate.
    #[arg(long, default_value_t = 5)]
    pub years: u32,

    /// Mean number of sales per day.
    #[arg(long, default_value_t = 8.0)]
    pub sales_per_day: f64,
}
