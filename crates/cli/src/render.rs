//! Plain-text rendering for the terminal.

use runtime::projection::Chart;
use runtime::{
    OrchestrationResult, Projection, SessionStats, Table, Termination, ToolRegistry,
    projection::cell_text,
};
use std::fmt::Write;

const MAX_CELL_WIDTH: usize = 28;

/// The answer followed by a one-line summary of how it was produced.
pub fn answer(result: &OrchestrationResult) -> String {
    let mut out = format!("{}\n", result.final_answer);
    let mut meta = Vec::new();
    if !result.tool_calls_made.is_empty() {
        meta.push(format!("tools: {}", result.tool_calls_made.join(", ")));
    }
    meta.push(format!("{:.1}s", result.elapsed.as_secs_f64()));
    meta.push(format!("{} tokens", result.usage.total_tokens()));
    match &result.termination {
        Termination::Completed => {}
        Termination::IterationLimitExceeded => {
            meta.push(format!("stopped after {} tool rounds", result.round_trips));
        }
        Termination::Incomplete(reason) => meta.push(format!("incomplete ({reason})")),
    }
    let _ = writeln!(out, "  [{}]", meta.join(" | "));
    out
}

/// Chart list and a table preview.
pub fn projection(projection: &Projection, max_rows: usize) -> String {
    if let Some(notice) = &projection.notice {
        return format!("{notice}\n");
    }
    let mut out = String::new();
    for (label, descriptor) in &projection.charts {
        let _ = writeln!(
            out,
            "  {label}: {} ({}, {})",
            descriptor.title,
            descriptor.chart.kind(),
            chart_size(&descriptor.chart)
        );
    }
    if let Some(table) = &projection.table {
        out.push('\n');
        out.push_str(&self::table(table, max_rows));
    }
    out
}

fn chart_size(chart: &Chart) -> String {
    let (n, unit) = match chart {
        Chart::Funnel { stages } => (stages.len(), "stages"),
        Chart::Bar { categories, .. } => (categories.len(), "bars"),
        Chart::Pie { slices, .. } => (slices.len(), "slices"),
        Chart::Line { x, .. } => (x.len(), "points"),
        Chart::Scatter { points } => (points.len(), "points"),
        Chart::Radar { series, .. } => (series.len(), "series"),
        Chart::Heatmap { x, y, .. } => (x.len() * y.len(), "cells"),
        Chart::Sankey { links } => (links.len(), "links"),
        Chart::Treemap { nodes } => (nodes.len(), "nodes"),
        Chart::Gauges { gauges } => (gauges.len(), "gauges"),
        Chart::Waterfall { steps } => (steps.len(), "steps"),
    };
    format!("{n} {unit}")
}

/// Aligned columns, at most `max_rows` rows.
pub fn table(table: &Table, max_rows: usize) -> String {
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .take(max_rows)
        .map(|row| row.iter().map(|v| clip(&cell_text(v))).collect())
        .collect();
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain([column.chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = table.columns.iter().map(|c| clip(c)).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    if table.len() > max_rows {
        let _ = writeln!(out, "  ... {} more rows", table.len() - max_rows);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "  {}", line.join("  ").trim_end());
}

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
    clipped.push_str("...");
    clipped
}

/// Numbered list starting at `first`.
pub fn numbered<S: AsRef<str>>(items: &[S], first: usize) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {}", first + i, item.as_ref());
    }
    out
}

pub fn tools(registry: &ToolRegistry) -> String {
    let mut out = String::new();
    for spec in registry.list() {
        let _ = writeln!(out, "{}\n    {}", spec.name, spec.description);
        for param in &spec.parameters.params {
            let required = if param.required { " (required)" } else { "" };
            let _ = writeln!(out, "    - {}{required}", param.name);
        }
    }
    out
}

pub fn stats(stats: &SessionStats) -> String {
    let tools: Vec<&str> = stats.tools_used.iter().map(String::as_str).collect();
    format!(
        "queries: {}\naverage time: {:.1}s\ntools used: {}\n",
        stats.queries,
        stats.average_elapsed().as_secs_f64(),
        if tools.is_empty() {
            "none".to_string()
        } else {
            tools.join(", ")
        }
    )
}
