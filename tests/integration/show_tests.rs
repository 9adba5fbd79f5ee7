//! Integration tests for the show command

use crate::common::{sample_data, CliTestRunner};
use tabsync::TabsyncError;

#[test]
fn test_show_pretty_and_json() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_document("people.json", &sample_data::people_document())
        .unwrap();
    let path = runner.fixture().path("people.json");
    let path = path.to_str().unwrap();

    runner.expect_success(&["show", path]);
    runner.expect_success(&["show", path, "--format", "json"]);
}

#[test]
fn test_show_with_sort_and_filters() {
    let runner = CliTestRunner::new().unwrap();
    let path = runner
        .fixture()
        .create_document("people.json", &sample_data::people_document())
        .unwrap();
    let path = path.to_str().unwrap();

    runner.expect_success(&["show", path, "--sort", "Score", "--desc", "--filter", "Score>20"]);
    runner.expect_success(&["--verbose", "show", path, "--filter", "Name~a", "--filter", "ID!=2"]);
}

#[test]
fn test_show_document_view() {
    let runner = CliTestRunner::new().unwrap();
    let path = runner
        .fixture()
        .create_document("prices.json", &sample_data::prices_document())
        .unwrap();
    runner.expect_success(&["show", path.to_str().unwrap()]);
}

#[test]
fn test_show_missing_document() {
    let runner = CliTestRunner::new().unwrap();
    let path = runner.fixture().path("absent.json");
    let err = runner.expect_failure(&["show", path.to_str().unwrap()]);
    assert!(matches!(err, TabsyncError::DocumentNotFound { .. }));
}

#[test]
fn test_show_rejects_bad_arguments() {
    let runner = CliTestRunner::new().unwrap();
    let path = runner
        .fixture()
        .create_document("people.json", &sample_data::people_document())
        .unwrap();
    let path = path.to_str().unwrap();

    let err = runner.expect_failure(&["show", path, "--sort", "Age"]);
    assert!(matches!(err, TabsyncError::UnknownColumn { .. }));

    let err = runner.expect_failure(&["show", path, "--filter", "Score"]);
    assert!(matches!(err, TabsyncError::InvalidFilter { .. }));

    let err = runner.expect_failure(&["show", path, "--format", "xml"]);
    assert!(matches!(err, TabsyncError::InvalidInput { .. }));
}
