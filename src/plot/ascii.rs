//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each forecast series is drawn as a line with its own glyph; earlier series
//! win where lines cross. A legend maps glyphs to categories.

use crate::domain::{ForecastFile, ForecastSeries, Horizon};

const GLYPHS: [char; 10] = ['*', '+', 'o', 'x', '#', '@', '%', '=', '~', '&'];

/// Glyph used for the series at `index` (cycles when there are many series).
pub fn glyph_for(index: usize) -> char {
    GLYPHS[index % GLYPHS.len()]
}

/// Render all series over the horizon years.
pub fn render_forecast_plot(series: &[ForecastSeries], horizon: &Horizon, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(horizon);
    let (y_min, y_max) = y_range(series).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for (idx, s) in series.iter().enumerate() {
        draw_curve(&mut grid, &s.xy(), x_min, x_max, y_min, y_max, glyph_for(idx));
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: year=[{}, {}] | y=[{y_min:.2}, {y_max:.2}]\n",
        horizon.first, horizon.last
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for (idx, s) in series.iter().enumerate() {
        out.push_str(&format!("  {} {}\n", glyph_for(idx), s.category));
    }

    out
}

/// Render a plot from a saved forecast JSON file.
pub fn render_forecast_plot_from_file(file: &ForecastFile, width: usize, height: usize) -> String {
    let horizon = match (file.horizon.first(), file.horizon.last()) {
        (Some(&first), Some(&last)) => Horizon { first, last },
        _ => Horizon::DEFAULT,
    };
    render_forecast_plot(&file.series, &horizon, width, height)
}

fn x_range(horizon: &Horizon) -> (f64, f64) {
    let lo = horizon.first as f64;
    let hi = horizon.last as f64;
    if hi > lo { (lo, hi) } else { (lo - 0.5, lo + 0.5) }
}

fn y_range(series: &[ForecastSeries]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for v in series.iter().flat_map(|s| s.values()) {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Every series is the same flat line.
        Some((min_y - 1.0, max_y + 1.0))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None => put(grid, col as isize, row as isize, ch),
        }
        prev = Some((col, row));
    }
}

fn put(grid: &mut [Vec<char>], x: isize, y: isize, ch: char) {
    if y >= 0
        && (y as usize) < grid.len()
        && x >= 0
        && (x as usize) < grid[0].len()
        && grid[y as usize][x as usize] == ' '
    {
        grid[y as usize][x as usize] = ch;
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(grid, x0, y0, ch);

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastPoint, LinearFit, Target};

    fn series(category: &str, values: [f64; 5]) -> ForecastSeries {
        ForecastSeries {
            category: category.to_string(),
            category_id: 1,
            points: Horizon::DEFAULT
                .years()
                .into_iter()
                .zip(values)
                .map(|(year, value)| ForecastPoint { year, value })
                .collect(),
            fit: LinearFit {
                intercept: 0.0,
                coefficients: vec![0.0],
                n: 1,
                rmse: 0.0,
            },
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let data = [
            series("Latte", [1.0, 2.0, 3.0, 4.0, 5.0]),
            series("Cocoa", [3.0; 5]),
        ];
        let txt = render_forecast_plot(&data, &Horizon::DEFAULT, 10, 5);
        let expected = concat!(
            "Plot: year=[2024, 2028] | y=[0.80, 5.20]\n",
            "        **\n",
            "      **  \n",
            "++++**++++\n",
            " ***      \n",
            "*         \n",
            "  * Latte\n",
            "  + Cocoa\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn flat_only_input_still_renders() {
        let data = [series("Espresso", [1.0; 5])];
        let txt = render_forecast_plot(&data, &Horizon::DEFAULT, 10, 5);
        let rows: Vec<&str> = txt.lines().collect();
        assert_eq!(rows[3], "**********");
    }

    #[test]
    fn file_plot_uses_saved_horizon() {
        let file = ForecastFile {
            tool: "coffee".to_string(),
            target: Target::Transactions,
            horizon: vec![2024, 2025, 2026, 2027, 2028],
            series: vec![series("Latte", [1.0, 2.0, 3.0, 4.0, 5.0])],
        };
        let txt = render_forecast_plot_from_file(&file, 20, 6);
        assert!(txt.starts_with("Plot: year=[2024, 2028]"));
        assert!(txt.ends_with("  * Latte\n"));
    }
}
