//! Position-based change detection between two snapshots

use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

/// A single edit against a render surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SyncOp {
    /// Insert a row at `index`. The first cell goes with the insert, the
    /// remaining cells are set on the new row.
    InsertRow { index: usize, cells: Vec<String> },
    UpdateCell {
        row: usize,
        column: usize,
        text: String,
    },
    DeleteRow { index: usize },
}

/// Counts of the operations one sync emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub cells_updated: usize,
    pub rows_inserted: usize,
    pub rows_deleted: usize,
}

impl SyncSummary {
    pub fn from_ops(ops: &[SyncOp]) -> Self {
        let mut summary = Self::default();
        for op in ops {
            match op {
                SyncOp::InsertRow { .. } => summary.rows_inserted += 1,
                SyncOp::UpdateCell { .. } => summary.cells_updated += 1,
                SyncOp::DeleteRow { .. } => summary.rows_deleted += 1,
            }
        }
        summary
    }

    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }

    pub fn total_changes(&self) -> usize {
        self.cells_updated + self.rows_inserted + self.rows_deleted
    }
}

/// Change detector turning two generations of rendered rows into edits
pub struct ChangeDetector;

impl ChangeDetector {
    /// Compare `previous` and `current` row by row.
    ///
    /// Shared positions produce cell updates for text that differs, extra new
    /// rows are inserted in order, and surplus old rows are deleted from the
    /// end by repeatedly removing the row at the new length.
    ///
    /// The result is always content-correct, but it is only minimal when
    /// rows kept their relative order since `previous` was captured.
    pub fn detect_changes(previous: &Snapshot, current: &Snapshot) -> Vec<SyncOp> {
        let old_rows = previous.rows();
        let new_rows = current.rows();
        let shared = old_rows.len().min(new_rows.len());
        let mut ops = Vec::new();

        for (index, (old_row, new_row)) in old_rows.iter().zip(new_rows).enumerate() {
            Self::detect_cell_changes(index, old_row, new_row, &mut ops);
        }

        for (index, row) in new_rows.iter().enumerate().skip(shared) {
            ops.push(SyncOp::InsertRow {
                index,
                cells: row.clone(),
            });
        }

        for _ in new_rows.len()..old_rows.len() {
            ops.push(SyncOp::DeleteRow {
                index: new_rows.len(),
            });
        }

        ops
    }

    fn detect_cell_changes(row: usize, old_row: &[String], new_row: &[String], ops: &mut Vec<SyncOp>) {
        for (column, text) in new_row.iter().enumerate() {
            if old_row.get(column) != Some(text) {
                ops.push(SyncOp::UpdateCell {
                    row,
                    column,
                    text: text.clone(),
                });
            }
        }
    }

    /// Operations that rebuild a surface from nothing
    pub fn rebuild(current: &Snapshot) -> Vec<SyncOp> {
        Self::detect_changes(&Snapshot::default(), current)
    }
}
