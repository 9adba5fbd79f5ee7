//! Full and partial synchronization against an in-memory surface

use crate::common::assertions::assert_surface_matches;
use crate::common::sample_data::{grown_people, people_table, shared_people};
use tabsync::change_detection::SyncSummary;
use tabsync::schema::cell_filter;
use tabsync::surface::SurfaceEvent;
use tabsync::sync::{shared, SyncState};
use tabsync::table::FilterTarget;
use tabsync::{MemorySurface, Reconciler, Table, TableAdapter};

#[test]
fn test_people_scenario_full_then_single_cell_update() {
    let table = shared_people();
    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();

    let summary = reconciler.full_sync(&mut surface);
    assert_eq!(summary.rows_inserted, 2);
    assert_eq!(surface.rows(), [vec!["1", "John", "20"], vec!["2", "Mary", "30"]]);

    table
        .borrow_mut()
        .upsert_row(1, vec![2u32.into(), "Mary".into(), 31u32.into()]);
    surface.take_events();
    let summary = reconciler.partial_sync(&mut surface);

    assert_eq!(
        summary,
        SyncSummary {
            cells_updated: 1,
            rows_inserted: 0,
            rows_deleted: 0
        }
    );
    assert_eq!(
        surface.events(),
        [SurfaceEvent::SetCell {
            row: 1,
            column: 2,
            text: "31".to_string()
        }]
    );
    assert_eq!(surface.cell(1, 2), Some("31"));
}

#[test]
fn test_full_sync_declares_columns_before_rows() {
    let table = shared_people();
    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();
    reconciler.full_sync(&mut surface);

    let events = surface.events();
    assert_eq!(events[0], SurfaceEvent::ClearAll);
    assert!(matches!(events[1], SurfaceEvent::DeclareColumn { index: 0, ref name } if name == "ID"));
    assert!(matches!(events[3], SurfaceEvent::DeclareColumn { index: 2, .. }));
    assert!(matches!(events[4], SurfaceEvent::InsertRow { index: 0, ref text } if text == "1"));
    assert_eq!(surface.columns()[0].extra, tabsync::DisplayHints::default());
}

#[test]
fn test_partial_after_full_is_idempotent() {
    let table = shared_people();
    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();
    reconciler.full_sync(&mut surface);
    surface.take_events();

    assert!(!reconciler.partial_sync(&mut surface).has_changes());
    assert!(!reconciler.partial_sync(&mut surface).has_changes());
    assert!(surface.events().is_empty());
}

#[test]
fn test_growth_emits_exact_insertions() {
    for k in [1u32, 3, 10] {
        let table = shared_people();
        let mut reconciler = Reconciler::new(&table);
        let mut surface = MemorySurface::new();
        reconciler.full_sync(&mut surface);

        *table.borrow_mut() = grown_people(k);
        // Unrelated edit to a pre-existing row
        table
            .borrow_mut()
            .upsert_row(0, vec![1u32.into(), "Johnny".into(), 21u32.into()]);

        let summary = reconciler.partial_sync(&mut surface);
        assert_eq!(summary.rows_inserted, k as usize);
        assert_eq!(summary.rows_deleted, 0);
        assert_eq!(summary.cells_updated, 2);
        assert_surface_matches(&surface, &table.borrow());
    }
}

#[test]
fn test_growth_with_lower_ids_still_inserts_k() {
    let table = shared(Table::with_columns(people_table().columns().to_vec()));
    table
        .borrow_mut()
        .upsert_row(5, vec![1u32.into(), "John".into(), 20u32.into()]);
    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();
    reconciler.full_sync(&mut surface);

    // A lower id lands first in natural order and shifts the others down
    table
        .borrow_mut()
        .upsert_row(1, vec![0u32.into(), "Zed".into(), 5u32.into()]);

    let summary = reconciler.partial_sync(&mut surface);
    assert_eq!(summary.rows_inserted, 1);
    assert_eq!(summary.rows_deleted, 0);
    assert_surface_matches(&surface, &table.borrow());
}

#[test]
fn test_shrinking_by_rebuilding_a_smaller_row_set() {
    let table = shared(grown_people(3));
    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();
    reconciler.full_sync(&mut surface);
    surface.take_events();

    // There is no row removal; build the smaller table from scratch
    *table.borrow_mut() = people_table();
    let summary = reconciler.partial_sync(&mut surface);

    assert_eq!(summary.rows_deleted, 3);
    assert_eq!(summary.rows_inserted, 0);
    assert_eq!(summary.cells_updated, 0);
    assert_eq!(surface.events(), vec![SurfaceEvent::DeleteRow { index: 2 }; 3]);
    assert_surface_matches(&surface, &table.borrow());
}

#[test]
fn test_shrinking_through_filter_deletes_trailing_rows() {
    let table = shared(grown_people(4));
    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();
    reconciler.full_sync(&mut surface);

    // Keeps John, Mary and the first extra row
    TableAdapter::set_filter(
        &mut reconciler,
        0,
        cell_filter(|v| matches!(v.as_u32(), Some(id) if id <= 10)),
    );
    let summary = reconciler.partial_sync(&mut surface);
    assert_eq!(summary.rows_deleted, 3);
    assert_eq!(surface.rows().len(), 3);

    TableAdapter::clear_filter(&mut reconciler, FilterTarget::Column(0));
    let summary = reconciler.partial_sync(&mut surface);
    assert_eq!(summary.rows_inserted, 3);
    assert_surface_matches(&surface, &table.borrow());
}

#[test]
fn test_sort_then_full_sync_reorders_surface() {
    let table = shared_people();
    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();
    reconciler.full_sync(&mut surface);

    TableAdapter::sort_by_column(&mut reconciler, 2, false);
    reconciler.full_sync(&mut surface);
    assert_eq!(surface.rows(), [vec!["2", "Mary", "30"], vec!["1", "John", "20"]]);
}

#[test]
fn test_sort_then_partial_sync_is_content_correct() {
    let table = shared(grown_people(2));
    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();
    reconciler.full_sync(&mut surface);

    table.borrow_mut().sort_by_column(1, false);
    reconciler.partial_sync(&mut surface);
    assert_surface_matches(&surface, &table.borrow());
}

#[test]
fn test_reconciler_outliving_table_is_inert() {
    let table = shared_people();
    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();
    reconciler.full_sync(&mut surface);
    drop(table);
    surface.take_events();

    assert_eq!(reconciler.state(), SyncState::Unbound);
    assert!(!reconciler.partial_sync(&mut surface).has_changes());
    assert!(!reconciler.full_sync(&mut surface).has_changes());
    assert!(surface.events().is_empty());
    assert_eq!(surface.rows().len(), 2);

    let mut out = Vec::new();
    reconciler.export_csv(&mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_unbound_reconciler() {
    let mut reconciler: Reconciler<()> = Reconciler::unbound();
    let mut surface = MemorySurface::new();
    assert_eq!(reconciler.state(), SyncState::Unbound);
    assert!(!reconciler.full_sync(&mut surface).has_changes());
    assert!(reconciler.snapshot().is_empty());
}

#[test]
fn test_rebinding_switches_tables() {
    let first = shared_people();
    let second = shared(grown_people(1));
    let mut reconciler = Reconciler::new(&first);
    let mut surface = MemorySurface::new();
    reconciler.full_sync(&mut surface);

    reconciler.bind(&second);
    assert_eq!(reconciler.state(), SyncState::Bound);
    reconciler.full_sync(&mut surface);
    assert_surface_matches(&surface, &second.borrow());
}

#[test]
fn test_adapter_trait_object() {
    let table = shared_people();
    let mut adapter: Box<dyn TableAdapter<tabsync::DisplayHints>> = Box::new(Reconciler::new(&table));
    let mut surface = MemorySurface::new();

    adapter.full_sync(&mut surface);
    assert_eq!(adapter.column_names(), vec!["ID", "Name", "Score"]);
    assert_eq!(adapter.snapshot().len(), 2);
    assert_eq!(adapter.snapshot().cell(1, 1), Some("Mary"));
}
