//! List view glue: header clicks, filter commands, edits and export

use crate::change_detection::SyncSummary;
use crate::error::Result;
use crate::schema::CellFilter;
use crate::surface::RenderSurface;
use crate::sync::TableAdapter;
use crate::table::FilterTarget;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const ASCENDING_MARK: &str = " ▲";
pub const DESCENDING_MARK: &str = " ▼";

/// Drives a render surface from whichever table adapter is bound to it.
///
/// Without an adapter every command is a no-op.
pub struct ListController<E, S> {
    surface: S,
    adapter: Option<Box<dyn TableAdapter<E>>>,
    sort_column: Option<usize>,
    ascending: bool,
}

impl<E, S: RenderSurface<E>> ListController<E, S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            adapter: None,
            sort_column: None,
            ascending: true,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn is_bound(&self) -> bool {
        self.adapter.is_some()
    }

    /// Column and direction of the last header click
    pub fn sort_indicator(&self) -> Option<(usize, bool)> {
        self.sort_column.map(|col| (col, self.ascending))
    }

    /// Show a different table. The surface is rebuilt from scratch.
    pub fn bind(&mut self, adapter: Box<dyn TableAdapter<E>>) -> SyncSummary {
        self.sort_column = None;
        self.ascending = true;
        let adapter = self.adapter.insert(adapter);
        adapter.full_sync(&mut self.surface)
    }

    pub fn unbind(&mut self) -> Option<Box<dyn TableAdapter<E>>> {
        self.sort_column = None;
        self.adapter.take()
    }

    /// Bring the surface up to date with the bound table
    pub fn refresh(&mut self) -> SyncSummary {
        match self.adapter.as_mut() {
            Some(adapter) => adapter.partial_sync(&mut self.surface),
            None => SyncSummary::default(),
        }
    }

    /// Sort by a header click.
    ///
    /// Clicking the sorted column again flips the direction; any other
    /// column starts ascending.
    pub fn click_column(&mut self, col: usize) -> SyncSummary {
        let Some(adapter) = self.adapter.as_mut() else {
            return SyncSummary::default();
        };
        let names = adapter.column_names();
        if col >= names.len() {
            log::debug!("Ignoring click on column {}", col);
            return SyncSummary::default();
        }

        self.ascending = if self.sort_column == Some(col) {
            !self.ascending
        } else {
            true
        };
        self.sort_column = Some(col);

        adapter.sort_by_column(col, self.ascending);
        let summary = adapter.full_sync(&mut self.surface);

        let mark = if self.ascending {
            ASCENDING_MARK
        } else {
            DESCENDING_MARK
        };
        for (index, name) in names.iter().enumerate() {
            if index == col {
                self.surface.set_column_title(index, &format!("{}{}", name, mark));
            } else {
                self.surface.set_column_title(index, name);
            }
        }
        summary
    }

    pub fn set_filter(&mut self, col: usize, filter: CellFilter) -> SyncSummary {
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.set_filter(col, filter);
        }
        self.refresh()
    }

    pub fn clear_filter(&mut self, col: usize) -> SyncSummary {
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.clear_filter(FilterTarget::Column(col));
        }
        self.refresh()
    }

    pub fn clear_all_filters(&mut self) -> SyncSummary {
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.clear_filter(FilterTarget::All);
        }
        self.refresh()
    }

    /// Hand the first-column text of the selected surface rows to `edit`,
    /// then refresh.
    ///
    /// Nothing happens for an empty selection or one that matches no row.
    pub fn edit_selection<F>(&mut self, rows: &[usize], edit: F) -> SyncSummary
    where
        F: FnOnce(&[String]),
    {
        let Some(adapter) = self.adapter.as_ref() else {
            return SyncSummary::default();
        };
        let keys = adapter.snapshot().first_cells(rows);
        if keys.is_empty() {
            return SyncSummary::default();
        }
        edit(&keys);
        self.refresh()
    }

    /// Write the visible rows to `path` as CSV and return how many were written
    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        let Some(adapter) = self.adapter.as_ref() else {
            return Ok(0);
        };
        let mut writer = BufWriter::new(File::create(path)?);
        let count = adapter.export_csv(&mut writer)?;
        writer.flush()?;
        log::info!("Exported {} rows to {}", count, path.display());
        Ok(count)
    }
}
