//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the forecast pipeline
//! - hands the result to the chosen presentation (chart, dashboard, report)

use std::sync::Once;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{ChartArgs, Command, DashboardArgs, GenerateArgs, PlotArgs, ReportArgs};
use crate::data::{SampleConfig, generate_sales, write_sales_csv};
use crate::domain::ForecastConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `coffee` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    // We want `coffee` and `coffee --csv x.csv` to behave like `coffee chart ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Chart(args) => handle_chart(args),
        Command::Dashboard(args) => handle_dashboard(args),
        Command::Report(args) => handle_report(args),
        Command::Plot(args) => handle_plot(args),
        Command::Generate(args) => handle_generate(args),
    }
}

/// Logs go to stderr; the default level stays quiet so the TUI isn't disturbed.
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    });
}

fn handle_chart(args: ChartArgs) -> Result<(), AppError> {
    let config = ForecastConfig::new(args.input.csv, args.target);
    let run = pipeline::run_forecast(&config)?;
    crate::tui::run(&run)
}

fn handle_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let config = ForecastConfig::new(args.input.csv, args.target);
    let run = pipeline::run_forecast(&config)?;
    crate::dashboard::serve(&run, &args.host, args.port)
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = report_config_from_args(&args);
    let run = pipeline::run_forecast(&config)?;

    println!("{}", crate::report::format_run_summary(&run));
    println!("{}", crate::report::format_forecast_table(&run.series, &run.horizon));

    if config.plot_width > 0 && !args.no_plot {
        let plot = crate::plot::render_forecast_plot(&run.series, &run.horizon, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    if let Some(path) = &config.export_csv {
        crate::io::export::write_forecast_csv(path, &run.series)?;
        info!(path = %path.display(), "wrote forecast CSV");
    }
    if let Some(path) = &config.export_json {
        crate::io::forecast::write_forecast_json(path, run.target, &run.horizon, &run.series)?;
        info!(path = %path.display(), "wrote forecast JSON");
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::forecast::read_forecast_json(&args.forecast)?;
    let plot = crate::plot::render_forecast_plot_from_file(&file, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        seed: args.seed,
        start_year: args.start_year,
        years: args.years,
        sales_per_day: args.sales_per_day,
    };
    let rows = generate_sales(&config)?;
    write_sales_csv(&args.out, &rows)?;
    println!("Wrote {} sales to {}", rows.len(), args.out.display());
    Ok(())
}

pub fn report_config_from_args(args: &ReportArgs) -> ForecastConfig {
    ForecastConfig {
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
        ..ForecastConfig::new(args.input.csv.clone(), args.target)
    }
}

/// Rewrite argv so `coffee` defaults to `coffee chart`.
///
/// Rules:
/// - `coffee`                      -> `coffee chart`
/// - `coffee --csv x.csv ...`      -> `coffee chart --csv x.csv ...`
/// - `coffee --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("chart".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // Flags without a subcommand are chart flags.
    if arg1.starts_with('-') {
        argv.insert(1, "chart".to_string());
    }

    argv
}
