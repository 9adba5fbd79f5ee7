//! Rendered materialization of a table's visible rows

use crate::table::Table;
use serde::{Deserialize, Serialize};

/// Display text of every visible row at the time of capture.
///
/// Diffing only ever compares rendered strings, so the text is all a
/// reconciler needs to remember about what the surface shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    rows: Vec<Vec<String>>,
}

impl Snapshot {
    /// Render the table's visible rows in produced order
    pub fn capture<E>(table: &Table<E>) -> Self {
        let rows = table
            .visible_rows()
            .map(|row| table.render_row(row))
            .collect();
        Self { rows }
    }

    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Text of the first column of each listed row, skipping missing rows
    pub fn first_cells(&self, rows: &[usize]) -> Vec<String> {
        rows.iter()
            .filter_map(|&index| self.cell(index, 0))
            .map(str::to_string)
            .collect()
    }
}
