//! Output formatting utilities

use crate::change_detection::SyncSummary;
use crate::error::Result;
use crate::schema::{Align, DisplayHints};
use crate::surface::{MemorySurface, SurfaceEvent};
use std::path::Path;

/// Pretty printer for tabsync output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print what a surface currently shows as an aligned text grid
    pub fn print_surface(source: &Path, surface: &MemorySurface<DisplayHints>) {
        println!("📋 Table: {}", source.display());
        for line in render_grid(surface) {
            println!("{}", line);
        }
        println!("└─ {} visible rows", surface.rows().len());
    }

    /// Print the edits one reconciliation applied
    pub fn print_sync_results(old: &Path, new: &Path, summary: &SyncSummary, events: &[SurfaceEvent]) {
        println!("🔄 Reconcile: {} → {}", old.display(), new.display());

        if !summary.has_changes() {
            println!("└─ ✅ Surface already up to date");
            return;
        }

        println!("├─ Rows inserted: {}", summary.rows_inserted);
        println!("├─ Cells updated: {}", summary.cells_updated);
        println!("├─ Rows deleted: {}", summary.rows_deleted);
        println!("└─ Surface calls:");
        for (i, event) in events.iter().enumerate() {
            let prefix = if i == events.len() - 1 { "   └─" } else { "   ├─" };
            println!("{} {}", prefix, describe_event(event));
        }
    }
}

/// Header, separator and one line per row, padded to the widest cell
pub fn render_grid(surface: &MemorySurface<DisplayHints>) -> Vec<String> {
    let columns = surface.columns();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.title.chars().count()).collect();
    for row in surface.rows() {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        columns
            .iter()
            .zip(&widths)
            .zip(cells)
            .map(|((column, &width), cell)| pad(cell, width, column.extra.align))
            .collect::<Vec<_>>()
            .join(" │ ")
    };

    let titles = surface.column_titles();
    let mut lines = vec![line(&titles)];
    lines.push(
        widths
            .iter()
            .map(|&w| "─".repeat(w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    lines.extend(surface.rows().iter().map(|row| line(row)));
    lines
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{:<width$}", text),
        Align::Right => format!("{:>width$}", text),
        Align::Center => format!("{:^width$}", text),
    }
}

fn describe_event(event: &SurfaceEvent) -> String {
    match event {
        SurfaceEvent::ClearAll => "clear all".to_string(),
        SurfaceEvent::DeclareColumn { index, name } => format!("declare column {} '{}'", index, name),
        SurfaceEvent::InsertRow { index, text } => format!("insert row {} '{}'", index, text),
        SurfaceEvent::SetCell { row, column, text } => format!("set ({}, {}) = '{}'", row, column, text),
        SurfaceEvent::DeleteRow { index } => format!("delete row {}", index),
        SurfaceEvent::SetColumnTitle { index, title } => format!("title column {} '{}'", index, title),
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    pub fn format_surface(surface: &MemorySurface<DisplayHints>) -> Result<String> {
        let columns: Vec<_> = surface
            .columns()
            .iter()
            .map(|c| serde_json::json!({ "title": c.title, "extra": c.extra }))
            .collect();
        let json = serde_json::json!({
            "columns": columns,
            "rows": surface.rows(),
        });
        Self::format(&json)
    }

    pub fn format_sync_results(summary: &SyncSummary, events: &[SurfaceEvent]) -> Result<String> {
        let json = serde_json::json!({
            "summary": summary,
            "events": events,
        });
        Self::format(&json)
    }
}
