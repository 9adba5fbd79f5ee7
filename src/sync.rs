//! Reconciling a render surface with a live table

use crate::change_detection::{ChangeDetector, SyncOp, SyncSummary};
use crate::error::Result;
use crate::schema::CellFilter;
use crate::snapshot::Snapshot;
use crate::surface::{apply_ops, RenderSurface};
use crate::table::{FilterTarget, Table};
use std::cell::RefCell;
use std::io::Write;
use std::rc::{Rc, Weak};

/// A table shared between its owner and the reconcilers that display it
pub type SharedTable<E> = Rc<RefCell<Table<E>>>;

pub fn shared<E>(table: Table<E>) -> SharedTable<E> {
    Rc::new(RefCell::new(table))
}

/// Lifecycle of a [`Reconciler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No live table behind the reconciler
    Unbound,
    /// Table attached, surface not yet rebuilt
    Bound,
    /// At least one sync has completed
    Synced,
}

/// Table operations a list view needs, independent of column count
pub trait TableAdapter<E> {
    /// Write the visible rows as CSV
    /// Write the visible rows as CSV; returns the number of rows written
    fn export_csv(&self, writer: &mut dyn Write) -> Result<usize>;

    fn set_filter(&mut self, col: usize, filter: CellFilter);

    fn clear_filter(&mut self, target: FilterTarget);

    fn sort_by_column(&mut self, col: usize, ascending: bool);

    /// Clear the surface and rebuild it from the table
    fn full_sync(&mut self, surface: &mut dyn RenderSurface<E>) -> SyncSummary;

    /// Apply only what changed since the last sync
    fn partial_sync(&mut self, surface: &mut dyn RenderSurface<E>) -> SyncSummary;

    fn column_names(&self) -> Vec<String>;

    /// What the surface showed after the last sync
    fn snapshot(&self) -> &Snapshot;
}

/// Keeps a surface in step with a table through full rebuilds and
/// snapshot diffs.
///
/// The reconciler does not own the table; once the table is dropped every
/// operation is a no-op. A table that is mutably borrowed elsewhere during a
/// call is treated the same way.
pub struct Reconciler<E> {
    table: Weak<RefCell<Table<E>>>,
    snapshot: Snapshot,
    state: SyncState,
}

impl<E> Reconciler<E> {
    /// Attach to `table`, remembering its current visible rows
    pub fn new(table: &SharedTable<E>) -> Self {
        let snapshot = match table.try_borrow() {
            Ok(table) => Snapshot::capture(&table),
            Err(_) => Snapshot::default(),
        };
        Self {
            table: Rc::downgrade(table),
            snapshot,
            state: SyncState::Bound,
        }
    }

    /// A reconciler with no table; every sync is a no-op
    pub fn unbound() -> Self {
        Self {
            table: Weak::new(),
            snapshot: Snapshot::default(),
            state: SyncState::Unbound,
        }
    }

    /// Point at another table. The next sync should be a full one.
    pub fn bind(&mut self, table: &SharedTable<E>) {
        *self = Self::new(table);
    }

    pub fn state(&self) -> SyncState {
        if self.table.strong_count() == 0 {
            SyncState::Unbound
        } else {
            self.state
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn with_table<R>(&self, f: impl FnOnce(&Table<E>) -> R) -> Option<R> {
        let table = self.table.upgrade()?;
        let result = match table.try_borrow() {
            Ok(table) => Some(f(&table)),
            Err(_) => {
                log::warn!("Table is being modified; skipping");
                None
            }
        };
        result
    }

    fn with_table_mut<R>(&self, f: impl FnOnce(&mut Table<E>) -> R) -> Option<R> {
        let table = self.table.upgrade()?;
        let result = match table.try_borrow_mut() {
            Ok(mut table) => Some(f(&mut table)),
            Err(_) => {
                log::warn!("Table is borrowed elsewhere; skipping");
                None
            }
        };
        result
    }

    /// Clear the surface, declare every column and insert every visible row
    pub fn full_sync<S>(&mut self, surface: &mut S) -> SyncSummary
    where
        S: RenderSurface<E> + ?Sized,
    {
        let rebuilt = self.with_table(|table| {
            let current = Snapshot::capture(table);
            let ops = ChangeDetector::rebuild(&current);

            surface.freeze();
            surface.clear_all();
            for (index, column) in table.columns().iter().enumerate() {
                surface.declare_column(index, &column.name, &column.extra);
            }
            apply_ops::<E, S>(surface, &ops);
            surface.thaw();
            (current, ops)
        });

        let Some((current, ops)) = rebuilt else {
            log::debug!("Full sync skipped: no table");
            return SyncSummary::default();
        };
        self.finish(current, &ops, "Full")
    }

    /// Diff the table's visible rows against the snapshot and apply the
    /// difference.
    ///
    /// Diffing is by position, so the edits are minimal only when rows kept
    /// their relative order; after a re-sort use [`full_sync`].
    ///
    /// [`full_sync`]: Reconciler::full_sync
    pub fn partial_sync<S>(&mut self, surface: &mut S) -> SyncSummary
    where
        S: RenderSurface<E> + ?Sized,
    {
        let Some(current) = self.with_table(|table| Snapshot::capture(table)) else {
            log::debug!("Partial sync skipped: no table");
            return SyncSummary::default();
        };

        let ops = ChangeDetector::detect_changes(&self.snapshot, &current);
        apply_ops::<E, S>(surface, &ops);
        self.finish(current, &ops, "Partial")
    }

    fn finish(&mut self, current: Snapshot, ops: &[SyncOp], mode: &str) -> SyncSummary {
        let summary = SyncSummary::from_ops(ops);
        log::debug!(
            "{} sync: {} rows, {} inserted, {} updated cells, {} deleted",
            mode,
            current.len(),
            summary.rows_inserted,
            summary.cells_updated,
            summary.rows_deleted
        );
        self.snapshot = current;
        self.state = SyncState::Synced;
        summary
    }
}

impl<E> TableAdapter<E> for Reconciler<E> {
    fn export_csv(&self, writer: &mut dyn Write) -> Result<usize> {
        self.with_table(|table| table.write_csv(writer))
            .unwrap_or(Ok(0))
    }

    fn set_filter(&mut self, col: usize, filter: CellFilter) {
        self.with_table_mut(|table| table.set_filter(col, filter));
    }

    fn clear_filter(&mut self, target: FilterTarget) {
        self.with_table_mut(|table| table.clear_filter(target));
    }

    fn sort_by_column(&mut self, col: usize, ascending: bool) {
        self.with_table_mut(|table| table.sort_by_column(col, ascending));
    }

    fn full_sync(&mut self, surface: &mut dyn RenderSurface<E>) -> SyncSummary {
        Reconciler::full_sync(self, surface)
    }

    fn partial_sync(&mut self, surface: &mut dyn RenderSurface<E>) -> SyncSummary {
        Reconciler::partial_sync(self, surface)
    }

    fn column_names(&self) -> Vec<String> {
        self.with_table(|table| table.column_names()).unwrap_or_default()
    }

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}
