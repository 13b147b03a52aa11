//! Single-page HTML view with an embedded Plotly.js figure.

use serde_json::{Value, json};

use crate::app::pipeline::RunOutput;

pub const PAGE_HEADING: &str = "Coffee Sales Forecast Dashboard";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
/// Shown in place of the chart when Plotly.js cannot be fetched from the CDN.
pub const OFFLINE_NOTICE: &str = "Chart unavailable: Plotly.js could not be loaded from cdn.plot.ly (no network access?).";

/// Plotly figure (`{ data, layout }`) with one line trace per category.
pub fn figure_json(output: &RunOutput) -> Value {
    let years = output.horizon.years();

    let data: Vec<Value> = output
        .series
        .iter()
        .map(|s| {
            json!({
                "type": "scatter",
                "mode": "lines",
                "name": s.category,
                "x": s.points.iter().map(|p| p.year).collect::<Vec<_>>(),
                "y": s.points.iter().map(|p| p.value).collect::<Vec<_>>(),
            })
        })
        .collect();

    json!({
        "data": data,
        "layout": {
            "title": { "text": output.target.title() },
            "xaxis": {
                "title": { "text": "Year" },
                "tickmode": "array",
                "tickvals": years,
                "gridcolor": "#283442",
            },
            "yaxis": {
                "title": { "text": output.target.y_label() },
                "gridcolor": "#283442",
            },
            "legend": { "title": { "text": "Coffee Types" } },
            "paper_bgcolor": "#111111",
            "plot_bgcolor": "#111111",
            "font": { "color": "#f2f5fa" },
        },
    })
}

/// Render the whole page. Computed once before the server starts.
pub fn render_page(output: &RunOutput) -> String {
    // `</` inside a script block would end it early (category names are user data).
    let figure = figure_json(output).to_string().replace("</", "<\\/");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{PAGE_HEADING}</title>
<script src="{PLOTLY_CDN}"></script>
<style>
body {{ background: #111111; color: #f2f5fa; font-family: sans-serif; margin: 2rem; }}
#forecast {{ width: 100%; height: 600px; }}
</style>
</head>
<body>
<h1>{PAGE_HEADING}</h1>
<div id="forecast"></div>
<script>
const figure = {figure};
if (typeof Plotly === "undefined") {{
  document.getElementById("forecast").textContent = "{OFFLINE_NOTICE}";
}} else {{
  Plotly.newPlot("forecast", figure.data, figure.layout, {{ responsive: true }});
}}
</script>
</body>
</html>
"#
    )
}
