//! Plain-text formatting of run summaries and forecast tables.

use crate::app::pipeline::RunOutput;
use crate::domain::{ForecastSeries, Horizon, Target};

/// Format the run summary (dataset stats + per-category fit diagnostics).
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== coffee - {} ===\n", run.target.title()));

    let loaded = &run.loaded;
    out.push_str(&format!(
        "Rows: read={} | used={} | dropped={}\n",
        loaded.rows_read,
        loaded.rows_used(),
        loaded.dropped.len()
    ));
    if let Some((first, last)) = loaded.date_range() {
        out.push_str(&format!("Dates: {} .. {}\n", first.date(), last.date()));
    }
    out.push_str(&format!(
        "Categories: {} | horizon: {}..={}\n",
        run.categories.len(),
        run.horizon.first,
        run.horizon.last
    ));

    out.push_str("\nFits:\n");
    for s in &run.series {
        out.push_str(&format!(
            "  [{:>2}] {:<22} n={:<6} intercept={:>14.4} {} rmse={:.4}\n",
            s.category_id,
            s.category,
            s.fit.n,
            s.fit.intercept,
            fmt_coefficients(run.target, &s.fit.coefficients),
            s.fit.rmse,
        ));
    }
    out.push('\n');

    out
}

fn fmt_coefficients(target: Target, coefficients: &[f64]) -> String {
    match target {
        Target::Transactions => format!("slope={:.4}", coefficients.first().copied().unwrap_or(0.0)),
        Target::Revenue => {
            let parts: Vec<String> = crate::forecast::REVENUE_FEATURES
                .iter()
                .zip(coefficients)
                .map(|(name, b)| format!("{name}={b:.4}"))
                .collect();
            parts.join(" ")
        }
    }
}

/// Format forecasts as a category × year table.
pub fn format_forecast_table(series: &[ForecastSeries], horizon: &Horizon) -> String {
    let name_width = series
        .iter()
        .map(|s| s.category.chars().count())
        .max()
        .unwrap_or(0)
        .max("Category".len());

    let mut out = String::new();
    out.push_str(&format!("{:<name_width$}", "Category"));
    for year in horizon.years() {
        out.push_str(&format!(" {year:>10}"));
    }
    out.push('\n');

    for s in series {
        out.push_str(&format!("{:<name_width$}", s.category));
        for p in &s.points {
            out.push_str(&format!(" {:>10.2}", p.value));
        }
        out.push('\n');
    }

    out
}
