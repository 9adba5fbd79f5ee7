//! Integration tests for reconciling one document towards another

use crate::common::{sample_data, CliTestRunner};
use serde_json::json;
use tabsync::document::TableDocument;
use tabsync::surface::SurfaceEvent;
use tabsync::sync::shared;
use tabsync::{MemorySurface, Reconciler};

#[test]
fn test_diff_command_runs_for_both_formats() {
    let runner = CliTestRunner::new().unwrap();
    let old = runner
        .fixture()
        .create_document("old.json", &sample_data::people_document())
        .unwrap();
    let new = runner
        .fixture()
        .create_document("new.json", &sample_data::people_updated_document())
        .unwrap();

    let (old, new) = (old.to_str().unwrap(), new.to_str().unwrap());
    runner.expect_success(&["diff", old, new]);
    runner.expect_success(&["diff", old, new, "--format", "json"]);
    runner.expect_success(&["diff", old, old]);
}

#[test]
fn test_diff_with_changed_layout_rebuilds() {
    let runner = CliTestRunner::new().unwrap();
    let old = runner
        .fixture()
        .create_document("old.json", &sample_data::people_document())
        .unwrap();
    let new = runner
        .fixture()
        .create_document("other.json", &sample_data::prices_document())
        .unwrap();
    runner.expect_success(&["diff", old.to_str().unwrap(), new.to_str().unwrap()]);
}

#[test]
fn test_document_replacement_yields_positional_edits() {
    let old = TableDocument::from_json(&sample_data::people_document().to_string()).unwrap();
    let new = TableDocument::from_json(&sample_data::people_updated_document().to_string()).unwrap();

    let table = shared(old.build_table().unwrap());
    let mut reconciler = Reconciler::new(&table);
    let mut surface = MemorySurface::new();
    reconciler.full_sync(&mut surface);
    surface.take_events();

    *table.borrow_mut() = new.build_table().unwrap();
    let summary = reconciler.partial_sync(&mut surface);

    // Row 2 changes from Anna to Bob in place
    assert_eq!(summary.rows_inserted, 0);
    assert_eq!(summary.rows_deleted, 0);
    assert_eq!(
        surface.events(),
        [
            SurfaceEvent::SetCell { row: 1, column: 2, text: "31".into() },
            SurfaceEvent::SetCell { row: 2, column: 0, text: "4".into() },
            SurfaceEvent::SetCell { row: 2, column: 1, text: "Bob".into() },
            SurfaceEvent::SetCell { row: 2, column: 2, text: "40".into() },
        ]
    );
}

#[test]
fn test_diff_rejects_invalid_new_document() {
    let runner = CliTestRunner::new().unwrap();
    let old = runner
        .fixture()
        .create_document("old.json", &sample_data::people_document())
        .unwrap();
    let bad = runner
        .fixture()
        .create_document(
            "bad.json",
            &json!({
                "columns": [{"name": "ID", "kind": "uint32"}],
                "rows": [{"id": 0, "cells": ["one"]}]
            }),
        )
        .unwrap();

    let err = runner.expect_failure(&["diff", old.to_str().unwrap(), bad.to_str().unwrap()]);
    assert!(matches!(err, tabsync::TabsyncError::InvalidDocument { .. }));
}
