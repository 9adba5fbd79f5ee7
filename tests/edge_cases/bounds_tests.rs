//! Out-of-range indices, absent tables and degenerate shapes

use tabsync::change_detection::SyncSummary;
use tabsync::schema::cell_filter;
use tabsync::surface::{RenderSurface, SurfaceEvent};
use tabsync::sync::shared;
use tabsync::table::{FilterTarget, Row};
use tabsync::{CellValue, ColumnKind, ColumnSchema, MemorySurface, Reconciler, Table};

fn pair() -> Table<()> {
    let mut table = Table::with_columns(vec![
        ColumnSchema::new("A", ColumnKind::Int32),
        ColumnSchema::new("B", ColumnKind::NarrowString),
    ]);
    table.upsert_row(0, vec![1i32.into(), "x".into()]);
    table.upsert_row(1, vec![2i32.into(), "y".into()]);
    table
}

#[test]
fn test_schema_access_out_of_range() {
    let mut table = pair();
    let fallback = table.column_schema(99);
    assert_eq!(fallback.name, "");
    assert!(fallback.filter.is_none());

    table.set_column_schema(99, ColumnSchema::new("Z", ColumnKind::Float64));
    assert_eq!(table.column_names(), vec!["A", "B"]);
}

#[test]
fn test_filter_out_of_range_is_ignored() {
    let mut table = pair();
    table.set_filter(5, cell_filter(|_| false));
    assert!(!table.has_filters());
    assert_eq!(table.visible_count(), 2);
}

#[test]
fn test_clear_filter_out_of_range_means_all() {
    let mut table = pair();
    table.set_filter(0, cell_filter(|_| false));
    table.set_filter(1, cell_filter(|_| false));
    assert_eq!(table.visible_count(), 0);

    table.clear_filter(FilterTarget::Column(42));
    assert!(!table.has_filters());
    assert_eq!(table.visible_count(), 2);
}

#[test]
fn test_filter_target_from_option() {
    let mut table = pair();
    table.set_filter(1, cell_filter(|_| false));
    table.set_filter(0, cell_filter(|_| false));
    table.clear_filter(Some(0));
    assert!(table.has_filters());
    table.clear_filter(None);
    assert!(!table.has_filters());
}

#[test]
fn test_sort_out_of_range_leaves_cache_alone() {
    let mut table = pair();
    table.sort_by_column(1, false);
    table.sort_by_column(7, true);
    assert_eq!(table.sort_state(), Some((1, false)));
}

#[test]
fn test_rows_are_padded_and_truncated() {
    let mut table = pair();
    table.upsert_row(5, vec![9i32.into()]);
    table.upsert_row(6, vec![8i32.into(), "long".into(), "extra".into()]);

    let padded: Row = vec![9i32.into(), CellValue::NarrowString(String::new())];
    assert_eq!(table.row(5), Some(&padded));
    assert_eq!(table.row(6).unwrap().len(), 2);
}

#[test]
fn test_zero_column_table_syncs_empty_rows() {
    let table = shared(Table::<()>::new(0));
    table.borrow_mut().upsert_row(0, Vec::new());

    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();
    let summary = reconciler.full_sync(&mut surface);
    assert_eq!(summary.rows_inserted, 1);
    assert!(surface.columns().is_empty());
}

#[test]
fn test_empty_table_full_sync_only_declares_columns() {
    let table = shared(Table::<()>::with_columns(vec![ColumnSchema::new("A", ColumnKind::Int32)]));
    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();

    assert_eq!(reconciler.full_sync(&mut surface), SyncSummary::default());
    assert_eq!(
        surface.events(),
        [
            SurfaceEvent::ClearAll,
            SurfaceEvent::DeclareColumn { index: 0, name: "A".into() }
        ]
    );
}

#[test]
fn test_sync_while_table_is_borrowed() {
    let table = shared(pair());
    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();
    reconciler.full_sync(&mut surface);
    surface.take_events();

    {
        let _writer = table.borrow_mut();
        assert!(!reconciler.full_sync(&mut surface).has_changes());
        assert!(!reconciler.partial_sync(&mut surface).has_changes());
    }
    assert!(surface.events().is_empty());
    assert_eq!(surface.row_count(), 2);
}

#[test]
fn test_reconciler_created_while_borrowed_starts_empty() {
    let table = shared(pair());
    let reconciler = {
        let _writer = table.borrow_mut();
        Reconciler::new(&table)
    };
    assert!(reconciler.snapshot().is_empty());
}

#[test]
fn test_surface_ignores_bad_indices() {
    let mut surface: MemorySurface<()> = MemorySurface::new();
    surface.declare_column(0, "A", &());
    surface.set_cell(0, 0, "nothing here");
    surface.delete_row(3);
    let handle = surface.insert_row(10, "clamped");
    assert_eq!(handle, 0);
    surface.set_cell(handle, 5, "no column");
    assert_eq!(surface.rows(), [vec!["clamped"]]);
}
