//! Dual-axis line chart of the result table
//!
//! The swept parameter runs along the x-axis; the first output series is
//! scaled against the left axis, the second (when configured) against an
//! independently scaled right axis. The chart plot itself is normalized to
//! `[0, 1]` and the real scales live in label columns either side of it,
//! color-keyed to their series.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph},
};

use feasweep_core::{SweepConfig, SweepTable};

use crate::report::format_value;

const PRIMARY_COLOR: Color = Color::Cyan;
const SECONDARY_COLOR: Color = Color::Yellow;

/// One plotted output series, normalized for drawing
struct Series {
    label: String,
    color: Color,
    /// `(x, y / scale)` pairs over the solved rows
    points: Vec<(f64, f64)>,
    /// Real value bounds backing the normalized axis
    bounds: (f64, f64),
}

impl Series {
    fn build(label: String, color: Color, raw: Vec<(f64, f64)>) -> Self {
        let bounds = pad_bounds(raw.iter().map(|(_, y)| *y));
        let span = bounds.1 - bounds.0;
        let points = raw
            .into_iter()
            .map(|(x, y)| (x, (y - bounds.0) / span))
            .collect();
        Self {
            label,
            color,
            points,
            bounds,
        }
    }
}

/// Renderable chart state derived from a finished sweep
pub struct ChartView {
    title: String,
    x_label: String,
    x_bounds: (f64, f64),
    primary: Option<Series>,
    secondary: Option<Series>,
    point_count: usize,
    failed_count: usize,
}

impl ChartView {
    pub fn from_table(table: &SweepTable, config: &SweepConfig) -> Self {
        let primary = config.outputs.first().map(|spec| {
            Series::build(spec.header(), PRIMARY_COLOR, table.series(0, 0))
        });
        let secondary = config.outputs.get(1).map(|spec| {
            Series::build(spec.header(), SECONDARY_COLOR, table.series(0, 1))
        });

        let x_bounds = pad_bounds(
            table
                .records()
                .iter()
                .filter_map(|r| r.coordinates.first().copied()),
        );
        let x_label = config
            .parameters
            .first()
            .map(|p| p.header())
            .unwrap_or_else(|| "Parameter".to_string());

        Self {
            title: format!("FEA sweep on {}", config.document_label()),
            x_label,
            x_bounds,
            primary,
            secondary,
            point_count: table.len(),
            failed_count: table.failed_count(),
        }
    }

    /// Number of rows the chart is drawn from
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(primary) = &self.primary else {
            frame.render_widget(
                Paragraph::new("No output series to chart")
                    .style(Style::default().fg(Color::DarkGray)),
                area,
            );
            return;
        };
        if primary.points.is_empty() {
            frame.render_widget(
                Paragraph::new("No solved sweep points to chart")
                    .style(Style::default().fg(Color::DarkGray)),
                area,
            );
            return;
        }

        let [left, middle, right] = Layout::horizontal([
            Constraint::Length(12),
            Constraint::Min(24),
            Constraint::Length(12),
        ])
        .areas(area);

        self.render_axis_labels(frame, left, Some(primary), Alignment::Right);
        self.render_axis_labels(frame, right, self.secondary.as_ref(), Alignment::Left);

        let mut datasets = vec![
            Dataset::default()
                .name(primary.label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(primary.color))
                .data(&primary.points),
        ];
        if let Some(secondary) = &self.secondary {
            datasets.push(
                Dataset::default()
                    .name(secondary.label.clone())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(secondary.color))
                    .data(&secondary.points),
            );
        }

        let (x_min, x_max) = self.x_bounds;
        let x_mid = (x_min + x_max) / 2.0;
        let chart = Chart::new(datasets)
            .block(Block::bordered().title(self.title.clone()))
            .x_axis(
                Axis::default()
                    .title(self.x_label.clone())
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([x_min, x_max])
                    .labels([
                        format_value(x_min),
                        format_value(x_mid),
                        format_value(x_max),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds([0.0, 1.0]),
            );
        frame.render_widget(chart, middle);
    }

    /// Value scale for one series, drawn beside the plot in the series color
    fn render_axis_labels(
        &self,
        frame: &mut Frame,
        area: Rect,
        series: Option<&Series>,
        alignment: Alignment,
    ) {
        let Some(series) = series else {
            return;
        };
        let height = area.height as usize;
        if height < 7 {
            return;
        }

        let (min, max) = series.bounds;
        let mid = (min + max) / 2.0;

        // Rows line up with the plot area inside the chart border: one row
        // of border at the top, border plus x labels at the bottom.
        let top = 1;
        let bottom = height.saturating_sub(3);
        let middle = (top + bottom) / 2;

        let style = Style::default().fg(series.color);
        let mut lines: Vec<Line> = vec![Line::raw(""); height];
        lines[0] = Line::styled(series.label.clone(), style);
        lines[top] = Line::styled(format_value(max), style);
        lines[middle] = Line::styled(format_value(mid), style);
        lines[bottom] = Line::styled(format_value(min), style);

        frame.render_widget(Paragraph::new(lines).alignment(alignment), area);
    }
}

/// Padded (min, max) bounds over a value sequence; degenerate input gets a
/// unit-wide window so the axis always has extent
fn pad_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        min = min.min(value);
        max = max.max(value);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}
