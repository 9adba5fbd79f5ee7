//! # tabsync
//!
//! Typed in-memory tables with per-column filters and a cached sort, kept in
//! step with a list-style render surface through snapshot reconciliation.

pub mod cli;
pub mod error;
pub mod format;
pub mod value;
pub mod schema;
pub mod table;
pub mod snapshot;
pub mod change_detection;
pub mod surface;
pub mod sync;
pub mod filter;
pub mod document;
pub mod controller;
pub mod commands;
pub mod output;

pub use error::{Result, TabsyncError};
pub use schema::{ColumnKind, ColumnSchema, DisplayHints};
pub use surface::{MemorySurface, RenderSurface};
pub use sync::{Reconciler, SharedTable, TableAdapter};
pub use table::Table;
pub use value::CellValue;

/// Current format version for table documents
pub const FORMAT_VERSION: &str = "1.0.0";

/// Column width used when a document gives none
pub const DEFAULT_COLUMN_WIDTH: u32 = 150;
