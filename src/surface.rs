//! Render surface capability and an in-memory implementation

use crate::change_detection::SyncOp;
use serde::Serialize;

/// Handle returned by [`RenderSurface::insert_row`]
pub type RowHandle = usize;

/// What a reconciler needs from a list-style widget.
///
/// Column `extra` info is passed through as given. `freeze`/`thaw` bracket a
/// batch of edits so a widget can defer repainting; batches may nest.
pub trait RenderSurface<E> {
    fn clear_all(&mut self);
    fn declare_column(&mut self, index: usize, name: &str, extra: &E);
    fn insert_row(&mut self, index: usize, first_cell: &str) -> RowHandle;
    fn set_cell(&mut self, row: RowHandle, column: usize, text: &str);
    fn delete_row(&mut self, index: usize);
    fn row_count(&self) -> usize;

    /// Retitle an already declared column
    fn set_column_title(&mut self, _index: usize, _title: &str) {}

    fn freeze(&mut self) {}

    fn thaw(&mut self) {}
}

/// Apply diff operations to a surface inside one freeze/thaw batch
pub fn apply_ops<E, S>(surface: &mut S, ops: &[SyncOp])
where
    S: RenderSurface<E> + ?Sized,
{
    surface.freeze();
    for op in ops {
        match op {
            SyncOp::InsertRow { index, cells } => {
                let first = cells.first().map(String::as_str).unwrap_or_default();
                let handle = surface.insert_row(*index, first);
                for (column, text) in cells.iter().enumerate().skip(1) {
                    surface.set_cell(handle, column, text);
                }
            }
            SyncOp::UpdateCell { row, column, text } => surface.set_cell(*row, *column, text),
            SyncOp::DeleteRow { index } => surface.delete_row(*index),
        }
    }
    surface.thaw();
}

/// One call received by a [`MemorySurface`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SurfaceEvent {
    ClearAll,
    DeclareColumn { index: usize, name: String },
    InsertRow { index: usize, text: String },
    SetCell { row: usize, column: usize, text: String },
    DeleteRow { index: usize },
    SetColumnTitle { index: usize, title: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryColumn<E> {
    pub title: String,
    pub extra: E,
}

/// Surface that keeps its content in memory and logs every call.
///
/// Edits against rows or columns that do not exist are dropped, the way a
/// list widget ignores an invalid item index.
#[derive(Debug, Clone)]
pub struct MemorySurface<E> {
    columns: Vec<MemoryColumn<E>>,
    rows: Vec<Vec<String>>,
    events: Vec<SurfaceEvent>,
    freeze_depth: usize,
}

impl<E> Default for MemorySurface<E> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            events: Vec::new(),
            freeze_depth: 0,
        }
    }
}

impl<E> MemorySurface<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[MemoryColumn<E>] {
        &self.columns
    }

    pub fn column_titles(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.title.clone()).collect()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Return and forget the calls logged so far
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_depth > 0
    }
}

impl<E: Clone> RenderSurface<E> for MemorySurface<E> {
    fn clear_all(&mut self) {
        self.columns.clear();
        self.rows.clear();
        self.events.push(SurfaceEvent::ClearAll);
    }

    fn declare_column(&mut self, index: usize, name: &str, extra: &E) {
        let column = MemoryColumn {
            title: name.to_string(),
            extra: extra.clone(),
        };
        let index = index.min(self.columns.len());
        self.columns.insert(index, column);
        for row in &mut self.rows {
            if index <= row.len() {
                row.insert(index, String::new());
            }
        }
        self.events.push(SurfaceEvent::DeclareColumn {
            index,
            name: name.to_string(),
        });
    }

    fn insert_row(&mut self, index: usize, first_cell: &str) -> RowHandle {
        let index = index.min(self.rows.len());
        let mut row = vec![String::new(); self.columns.len().max(1)];
        row[0] = first_cell.to_string();
        self.rows.insert(index, row);
        self.events.push(SurfaceEvent::InsertRow {
            index,
            text: first_cell.to_string(),
        });
        index
    }

    fn set_cell(&mut self, row: RowHandle, column: usize, text: &str) {
        let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column)) else {
            log::debug!("Surface ignores cell ({}, {})", row, column);
            return;
        };
        *cell = text.to_string();
        self.events.push(SurfaceEvent::SetCell {
            row,
            column,
            text: text.to_string(),
        });
    }

    fn delete_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
            self.events.push(SurfaceEvent::DeleteRow { index });
        }
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn set_column_title(&mut self, index: usize, title: &str) {
        if let Some(column) = self.columns.get_mut(index) {
            column.title = title.to_string();
            self.events.push(SurfaceEvent::SetColumnTitle {
                index,
                title: title.to_string(),
            });
        }
    }

    fn freeze(&mut self) {
        self.freeze_depth += 1;
    }

    fn thaw(&mut self) {
        self.freeze_depth = self.freeze_depth.saturating_sub(1);
    }
}
