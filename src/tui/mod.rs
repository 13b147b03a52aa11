//! Ratatui-based chart view for forecast runs.
//!
//! Shows one line per category over the horizon years with a legend keyed by
//! category name. The view blocks until the user quits (`q` / `Esc`).

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::RunOutput;
use crate::domain::ForecastSeries;
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{ChartLine, ForecastPlottersChart};

/// High-contrast palette for terminal readability; cycles for many categories.
const PALETTE: [(u8, u8, u8); 8] = [
    (0, 255, 255),
    (255, 200, 0),
    (0, 255, 0),
    (255, 90, 90),
    (180, 120, 255),
    (255, 140, 0),
    (90, 160, 255),
    (255, 105, 180),
];

pub fn palette_rgb(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// Show the forecast chart and block until the user quits.
pub fn run(output: &RunOutput) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut view = ChartView::new(output);
    view.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct ChartView<'a> {
    output: &'a RunOutput,
    /// Precomputed `(year, value)` pairs per series.
    lines: Vec<Vec<(f64, f64)>>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    legend: ListState,
}

impl<'a> ChartView<'a> {
    fn new(output: &'a RunOutput) -> Self {
        let lines = output.series.iter().map(ForecastSeries::xy).collect();
        let (x_bounds, y_bounds) = chart_bounds(&output.series);
        Self {
            output,
            lines,
            x_bounds,
            y_bounds,
            legend: ListState::default(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the view should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let n = self.output.series.len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down if n > 0 => {
                let next = self.legend.selected().map_or(0, |i| (i + 1) % n);
                self.legend.select(Some(next));
            }
            KeyCode::Up if n > 0 => {
                let prev = self.legend.selected().map_or(n - 1, |i| (i + n - 1) % n);
                self.legend.select(Some(prev));
            }
            KeyCode::Char('c') => self.legend.select(None),
            _ => {}
        }
        false
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let loaded = &self.output.loaded;
        let lines = vec![
            Line::from(vec![
                Span::styled("coffee", Style::default().fg(Color::Cyan)),
                Span::raw(" - "),
                Span::raw(self.output.target.title()),
            ]),
            Line::from(Span::styled(
                format!(
                    "rows used: {} | dropped: {} | categories: {} | horizon: {}..={}",
                    loaded.rows_used(),
                    loaded.dropped.len(),
                    self.output.categories.len(),
                    self.output.horizon.first,
                    self.output.horizon.last,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(30)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_legend(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Forecast").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.lines.is_empty() {
            let msg = Paragraph::new("No categories to plot.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let selected = self.legend.selected();
        let lines = self
            .lines
            .iter()
            .enumerate()
            .map(|(idx, points)| {
                let (r, g, b) = palette_rgb(idx);
                ChartLine {
                    points,
                    color: RGBColor(r, g, b),
                    highlighted: selected == Some(idx),
                }
            })
            .collect();

        let widget = ForecastPlottersChart {
            lines,
            x_bounds: self.x_bounds,
            y_bounds: self.y_bounds,
            x_ticks: self.output.horizon.len(),
            x_label: "Year",
            y_label: self.output.target.y_label(),
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_value,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_legend(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .output
            .series
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                let (r, g, b) = palette_rgb(idx);
                let last = s.points.last().map(|p| p.value).unwrap_or(f64::NAN);
                ListItem::new(Line::from(vec![
                    Span::styled("━━ ", Style::default().fg(Color::Rgb(r, g, b))),
                    Span::raw(s.category.clone()),
                    Span::styled(format!(" {last:.1}"), Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Coffee Types").borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.legend);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ highlight category  c clear  q quit";
        let p = Paragraph::new(Span::styled(help, Style::default().fg(Color::Gray)))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// X bounds span the horizon years; Y bounds cover every value with 5% padding.
fn chart_bounds(series: &[ForecastSeries]) -> ([f64; 2], [f64; 2]) {
    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for s in series {
        for p in &s.points {
            x0 = x0.min(p.year as f64);
            x1 = x1.max(p.year as f64);
            y0 = y0.min(p.value);
            y1 = y1.max(p.value);
        }
    }

    if !x0.is_finite() || !x1.is_finite() || x1 <= x0 {
        x0 = 0.0;
        x1 = 1.0;
    }
    if !y0.is_finite() || !y1.is_finite() {
        y0 = 0.0;
        y1 = 1.0;
    } else if y1 <= y0 {
        y0 -= 1.0;
        y1 += 1.0;
    }

    let pad = ((y1 - y0).abs() * 0.05).max(1e-12);
    ([x0, x1], [y0 - pad, y1 + pad])
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_value(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{:.1}k", v / 1000.0)
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastPoint, Horizon, LinearFit};

    fn series(values: [f64; 5]) -> ForecastSeries {
        ForecastSeries {
            category: "Latte".to_string(),
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
    fn bounds_cover_horizon_and_values() {
        let (x, y) = chart_bounds(&[series([0.0, 5.0, 10.0, 15.0, 20.0])]);
        assert_eq!(x, [2024.0, 2028.0]);
        assert!((y[0] - -1.0).abs() < 1e-12);
        assert!((y[1] - 21.0).abs() < 1e-12);
    }

    #[test]
    fn flat_series_gets_a_nonzero_y_span() {
        let (_, y) = chart_bounds(&[series([3.0; 5])]);
        assert!(y[0] < 3.0 && y[1] > 3.0);
    }

    #[test]
    fn axis_formatting() {
        assert_eq!(fmt_axis_year(2026.0), "2026");
        assert_eq!(fmt_axis_value(12.34), "12.3");
        assert_eq!(fmt_axis_value(2500.0), "2.5k");
    }
}
