//! Unit tests for CLI argument parsing and validation

use clap::Parser;
use std::path::PathBuf;
use tabsync::cli::{Cli, Commands, OutputFormat};

#[test]
fn test_cli_show_command_defaults() {
    let cli = Cli::try_parse_from(["tabsync", "show", "people.json"]).unwrap();
    match cli.command {
        Commands::Show {
            document,
            sort,
            desc,
            filters,
            format,
        } => {
            assert_eq!(document, PathBuf::from("people.json"));
            assert!(sort.is_none());
            assert!(!desc);
            assert!(filters.is_empty());
            assert_eq!(format, "pretty");
        }
        _ => panic!("Expected Show command"),
    }
}

#[test]
fn test_cli_show_command_with_options() {
    let cli = Cli::try_parse_from([
        "tabsync", "show", "people.json",
        "--sort", "Score",
        "--desc",
        "--filter", "Score>=20",
        "--filter", "Name~a",
        "--format", "json",
    ])
    .unwrap();

    match cli.command {
        Commands::Show { sort, desc, filters, format, .. } => {
            assert_eq!(sort.as_deref(), Some("Score"));
            assert!(desc);
            assert_eq!(filters, vec!["Score>=20", "Name~a"]);
            assert_eq!(format, "json");
        }
        _ => panic!("Expected Show command"),
    }
}

#[test]
fn test_cli_export_requires_output() {
    assert!(Cli::try_parse_from(["tabsync", "export", "people.json"]).is_err());

    let cli = Cli::try_parse_from(["tabsync", "export", "people.json", "-o", "out.csv"]).unwrap();
    match cli.command {
        Commands::Export { output, .. } => assert_eq!(output, PathBuf::from("out.csv")),
        _ => panic!("Expected Export command"),
    }
}

#[test]
fn test_cli_diff_command() {
    let cli = Cli::try_parse_from(["tabsync", "diff", "old.json", "new.json"]).unwrap();
    match cli.command {
        Commands::Diff { old, new, format } => {
            assert_eq!(old, PathBuf::from("old.json"));
            assert_eq!(new, PathBuf::from("new.json"));
            assert_eq!(format, "pretty");
        }
        _ => panic!("Expected Diff command"),
    }
}

#[test]
fn test_cli_verbose_is_global() {
    let cli = Cli::try_parse_from(["tabsync", "diff", "a.json", "b.json", "--verbose"]).unwrap();
    assert!(cli.verbose);

    let cli = Cli::try_parse_from(["tabsync", "-v", "show", "a.json"]).unwrap();
    assert!(cli.verbose);
}

#[test]
fn test_cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["tabsync", "snapshot", "a.json"]).is_err());
    assert!(Cli::try_parse_from(["tabsync"]).is_err());
}

#[test]
fn test_output_format_parse() {
    assert!(matches!(OutputFormat::parse("pretty"), Ok(OutputFormat::Pretty)));
    assert!(matches!(OutputFormat::parse("Json"), Ok(OutputFormat::Json)));
    assert!(OutputFormat::parse("table").is_err());
}
