//! Formatted terminal output for each subcommand.
//!
//! We keep formatting code in one place so:
//! - the prep/plot code stays clean and testable
//! - output changes are localized (easy to snapshot)
//!
//! Summaries go to stderr when the data itself is written to stdout.

use crate::domain::{MonthlyTemperatureTable, TargetItems};
use crate::plot::ItemGrid;
use crate::prep::CleanOutcome;

/// Summary of a `clean` run: filter counts and the final shape.
pub fn format_clean_summary(outcome: &CleanOutcome, targets: &TargetItems) -> String {
    let mut out = String::new();
    let (rows, cols) = outcome.shape();

    out.push_str("=== salesprep - sales cleaning ===\n");
    out.push_str(&format!(
        "Targets: {} ({})\n",
        targets.len(),
        targets.iter().collect::<Vec<_>>().join(", ")
    ));
    out.push_str(&format!("Rows read: {}\n", outcome.rows_read));
    out.push_str(&format!(
        "Dropped: sparse={} samples={} non-target={}\n",
        outcome.dropped_sparse, outcome.dropped_samples, outcome.dropped_non_target
    ));
    out.push_str(&format!("Final Dataset Shape: ({rows}, {cols})\n"));

    let mut per_item: Vec<(&str, usize)> = targets
        .iter()
        .map(|code| (code, outcome.sales.iter().filter(|s| s.item_code == code).count()))
        .collect();
    per_item.retain(|(_, n)| *n > 0);
    if !per_item.is_empty() {
        out.push_str("\nRows per item:\n");
        for (code, n) in per_item {
            out.push_str(&format!("  {:<16} {n:>8}\n", truncate(code, 16)));
        }
    }

    out
}

/// Summary of a `temperature` run.
pub fn format_temperature_summary(table: &MonthlyTemperatureTable) -> String {
    let mut out = String::new();
    out.push_str("=== salesprep - temperature reshape ===\n");
    out.push_str(&format!("Column: {}\n", table.value_column));
    out.push_str(&format!("Records: {}\n", table.len()));

    if let Some((first, last)) = table.date_range() {
        out.push_str(&format!("Dates: {first}..{last}\n"));
    }

    let finite: Vec<f64> = table.records.iter().map(|r| r.value).filter(|v| v.is_finite()).collect();
    let missing = table.len() - finite.len();
    if let (Some(min), Some(max)) = (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) {
        out.push_str(&format!("Values: [{min:.2}, {max:.2}]"));
        if missing > 0 {
            out.push_str(&format!(" | missing={missing}"));
        }
        out.push('\n');
    } else if missing > 0 {
        out.push_str(&format!("Values: all missing ({missing})\n"));
    }

    out
}

/// One line per panel: position, code, title and point count.
pub fn format_grid_summary(grid: &ItemGrid) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Grid: {}x{} | panels={} | empty={}\n",
        grid.rows,
        grid.cols,
        grid.panels.len(),
        grid.empty_panels()
    ));
    for panel in &grid.panels {
        out.push_str(
            format!(
                "  ({}, {}) {:<12} {:<24} {:>5} pts\n",
                panel.row,
                panel.col,
                truncate(&panel.item_code, 12),
                truncate(&panel.title, 24),
                panel.points.len()
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
