//! Command implementations for tabsync CLI

use crate::cli::{Commands, OutputFormat};
use crate::controller::ListController;
use crate::document::TableDocument;
use crate::error::{Result, TabsyncError};
use crate::filter::FilterExpr;
use crate::output::{JsonFormatter, PrettyPrinter};
use crate::schema::DisplayHints;
use crate::surface::MemorySurface;
use crate::sync::{shared, Reconciler, SharedTable};
use crate::table::Table;
use std::path::Path;

type ListView = ListController<DisplayHints, MemorySurface<DisplayHints>>;

/// Execute a command
pub fn execute_command(command: Commands) -> Result<()> {
    match command {
        Commands::Show {
            document,
            sort,
            desc,
            filters,
            format,
        } => show_command(&document, sort.as_deref(), desc, &filters, &format),
        Commands::Export {
            document,
            output,
            sort,
            desc,
            filters,
        } => export_command(&document, &output, sort.as_deref(), desc, &filters),
        Commands::Diff { old, new, format } => diff_command(&old, &new, &format),
    }
}

/// Load a document into a table with its own view plus extra filters applied
fn load_table(path: &Path, filters: &[String]) -> Result<Table<DisplayHints>> {
    let document = TableDocument::load(path)?;
    let mut table = document.build_table()?;
    document.apply_view(&mut table)?;

    for text in filters {
        let col = FilterExpr::parse(text)?.apply(&mut table)?;
        log::debug!("Filter '{}' installed on column {}", text, col);
    }
    Ok(table)
}

fn column_index(table: &SharedTable<DisplayHints>, name: &str) -> Result<usize> {
    table
        .borrow()
        .columns()
        .iter()
        .position(|c| c.name == name)
        .ok_or_else(|| TabsyncError::unknown_column(name))
}

fn bind_view(table: &SharedTable<DisplayHints>) -> ListView {
    let mut view = ListController::new(MemorySurface::new());
    view.bind(Box::new(Reconciler::new(table)));
    view
}

/// Render a document through a list view
fn show_command(
    document: &Path,
    sort: Option<&str>,
    desc: bool,
    filters: &[String],
    format: &str,
) -> Result<()> {
    let output_format = OutputFormat::parse(format).map_err(TabsyncError::invalid_input)?;

    let table = shared(load_table(document, filters)?);
    let mut view = bind_view(&table);

    if let Some(name) = sort {
        let col = column_index(&table, name)?;
        view.click_column(col);
        if desc {
            view.click_column(col);
        }
    }

    match output_format {
        OutputFormat::Pretty => PrettyPrinter::print_surface(document, view.surface()),
        OutputFormat::Json => println!("{}", JsonFormatter::format_surface(view.surface())?),
    }
    Ok(())
}

/// Export the visible rows of a document as CSV
fn export_command(
    document: &Path,
    output: &Path,
    sort: Option<&str>,
    desc: bool,
    filters: &[String],
) -> Result<()> {
    let table = shared(load_table(document, filters)?);
    if let Some(name) = sort {
        let col = column_index(&table, name)?;
        table.borrow_mut().sort_by_column(col, !desc);
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let view = bind_view(&table);
    let count = view.export_csv(output)?;
    println!("✅ Exported {} rows to: {}", count, output.display());
    Ok(())
}

/// Reconcile a surface showing `old` towards `new` and report the edits
fn diff_command(old: &Path, new: &Path, format: &str) -> Result<()> {
    let output_format = OutputFormat::parse(format).map_err(TabsyncError::invalid_input)?;

    let table = shared(load_table(old, &[])?);
    let mut view = bind_view(&table);
    view.surface_mut().take_events();

    let replacement = load_table(new, &[])?;
    let same_layout = replacement.column_names() == table.borrow().column_names();
    *table.borrow_mut() = replacement;

    let summary = if same_layout {
        view.refresh()
    } else {
        log::info!("Column layout changed; rebuilding the surface");
        view.bind(Box::new(Reconciler::new(&table)))
    };
    let events = view.surface_mut().take_events();

    match output_format {
        OutputFormat::Pretty => PrettyPrinter::print_sync_results(old, new, &summary, &events),
        OutputFormat::Json => println!("{}", JsonFormatter::format_sync_results(&summary, &events)?),
    }
    Ok(())
}
