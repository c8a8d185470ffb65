//! Console rendering of the result table

use std::time::Duration;

use feasweep_core::SweepTable;
use feasweep_core::results::PointStatus;

/// Format a swept or reduced value for a table cell
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-3..1e7).contains(&magnitude) {
        return format!("{value:.3e}");
    }
    let mut formatted = format!("{value:.4}");
    if formatted.contains('.') {
        while formatted.ends_with('0') {
            formatted.pop();
        }
        if formatted.ends_with('.') {
            formatted.pop();
        }
    }
    formatted
}

/// Format a solve runtime for a table cell
pub fn format_runtime(runtime: Duration) -> String {
    let micros = runtime.as_micros();
    if micros < 1_000 {
        format!("{micros} µs")
    } else if micros < 1_000_000 {
        format!("{} ms", micros / 1_000)
    } else {
        format!("{:.2} s", runtime.as_secs_f64())
    }
}

/// Render the full result table as aligned text
pub fn render_table(table: &SweepTable) -> String {
    let with_status = table.failed_count() > 0;

    let mut headers: Vec<String> = Vec::new();
    headers.extend(table.parameter_headers().iter().cloned());
    headers.extend(table.output_headers().iter().cloned());
    headers.push("Runtime".to_string());
    if with_status {
        headers.push("Status".to_string());
    }

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(table.len());
    for record in table.records() {
        let mut row: Vec<String> = Vec::with_capacity(headers.len());
        row.extend(record.coordinates.iter().map(|v| format_value(*v)));
        match &record.status {
            PointStatus::Solved => {
                row.extend(record.outputs.iter().map(|v| format_value(*v)));
            }
            PointStatus::Failed(_) => {
                row.extend(table.output_headers().iter().map(|_| "-".to_string()));
            }
        }
        row.push(format_runtime(record.runtime));
        if with_status {
            row.push(match &record.status {
                PointStatus::Solved => "solved".to_string(),
                PointStatus::Failed(message) => format!("failed: {message}"),
            });
        }
        rows.push(row);
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    render_row(&mut out, &headers, &widths);
    let rule_len = widths.iter().sum::<usize>() + 2 * (widths.len().saturating_sub(1));
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');
    for row in &rows {
        render_row(&mut out, row, &widths);
    }
    out
}

fn render_row(out: &mut String, cells: &[String], widths: &[usize]) {
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        let pad = width.saturating_sub(cell.chars().count());
        out.push_str(&" ".repeat(pad));
        out.push_str(cell);
    }
    out.push('\n');
}
