//! JSON table documents: column layout, rows and an initial view

use crate::error::{Result, TabsyncError};
use crate::filter::FilterExpr;
use crate::format::{sprintf, FormatArg};
use crate::schema::{ColumnKind, ColumnSchema, DisplayHints};
use crate::table::{RowId, Table};
use crate::value::CellValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One column of a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    /// Overrides the kind's default template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub extra: DisplayHints,
}

/// One row of a document; cells are plain JSON values typed by column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowSpec {
    pub id: RowId,
    pub cells: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

fn default_version() -> String {
    crate::FORMAT_VERSION.to_string()
}

/// A table described in JSON.
///
/// ```json
/// {
///   "columns": [{"name": "ID", "kind": "uint32"}, {"name": "Name", "kind": "narrow_string"}],
///   "rows": [{"id": 0, "cells": [1, "John"]}],
///   "filters": ["ID>=1"],
///   "sort": {"column": "Name", "ascending": false}
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDocument {
    #[serde(default = "default_version")]
    pub version: String,
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub rows: Vec<RowSpec>,
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub sort: Option<SortSpec>,
}

impl TableDocument {
    /// Read and validate a document from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(TabsyncError::DocumentNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        let document = Self::from_json(&content)?;
        log::debug!(
            "Loaded {} ({} columns, {} rows)",
            path.display(),
            document.columns.len(),
            document.rows.len()
        );
        Ok(document)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(content)?;
        document.validate()?;
        Ok(document)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if major_version(&self.version) != major_version(crate::FORMAT_VERSION) {
            return Err(TabsyncError::invalid_document(format!(
                "unsupported document version '{}' (expected {})",
                self.version,
                crate::FORMAT_VERSION
            )));
        }
        if self.columns.is_empty() {
            return Err(TabsyncError::invalid_document("at least one column is required"));
        }
        for (index, column) in self.columns.iter().enumerate() {
            if self.columns[..index].iter().any(|c| c.name == column.name) {
                return Err(TabsyncError::invalid_document(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
            if let Some(format) = column.format.as_ref().filter(|_| column.kind.is_numeric()) {
                sprintf(format, FormatArg::Signed { value: 0, bits: 32 }).map_err(|e| {
                    log::warn!("Column '{}' has an unusable format {:?}", column.name, format);
                    e
                })?;
            }
        }
        Ok(())
    }

    pub fn schemas(&self) -> Vec<ColumnSchema<DisplayHints>> {
        self.columns
            .iter()
            .map(|column| {
                let schema = ColumnSchema::new(column.name.clone(), column.kind).with_extra(column.extra);
                match &column.format {
                    Some(format) => schema.with_format(format.clone()),
                    None => schema,
                }
            })
            .collect()
    }

    /// Build a table holding every row, without the document's view
    pub fn build_table(&self) -> Result<Table<DisplayHints>> {
        let mut table = Table::with_columns(self.schemas());

        for row in &self.rows {
            if row.cells.len() != self.columns.len() {
                return Err(TabsyncError::invalid_document(format!(
                    "row {} has {} cells, expected {}",
                    row.id,
                    row.cells.len(),
                    self.columns.len()
                )));
            }
            let cells = self
                .columns
                .iter()
                .zip(&row.cells)
                .map(|(column, value)| {
                    cell_from_json(column.kind, value).map_err(|e| {
                        TabsyncError::invalid_document(format!(
                            "row {} column '{}': {}",
                            row.id, column.name, e
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            table.upsert_row(row.id, cells);
        }

        Ok(table)
    }

    /// Apply the document's filters and sort to `table`
    pub fn apply_view(&self, table: &mut Table<DisplayHints>) -> Result<()> {
        for text in &self.filters {
            FilterExpr::parse(text)?.apply(table)?;
        }

        if let Some(sort) = &self.sort {
            let col = table
                .columns()
                .iter()
                .position(|c| c.name == sort.column)
                .ok_or_else(|| TabsyncError::unknown_column(&sort.column))?;
            table.sort_by_column(col, sort.ascending);
        }
        Ok(())
    }
}

fn major_version(version: &str) -> &str {
    version.split('.').next().unwrap_or_default().trim()
}

/// Convert a JSON value into a cell of `kind`
pub fn cell_from_json(kind: ColumnKind, value: &Value) -> Result<CellValue> {
    let mismatch = || TabsyncError::invalid_input(format!("{} is not a valid {}", value, kind));

    let cell = match kind {
        ColumnKind::Int32 => CellValue::Int32(
            value
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(mismatch)?,
        ),
        ColumnKind::Int64 => CellValue::Int64(value.as_i64().ok_or_else(mismatch)?),
        ColumnKind::UInt32 => CellValue::UInt32(
            value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(mismatch)?,
        ),
        ColumnKind::UInt64 => CellValue::UInt64(value.as_u64().ok_or_else(mismatch)?),
        ColumnKind::Float32 => CellValue::Float32(value.as_f64().ok_or_else(mismatch)? as f32),
        ColumnKind::Float64 => CellValue::Float64(value.as_f64().ok_or_else(mismatch)?),
        ColumnKind::NarrowString => CellValue::from(value.as_str().ok_or_else(mismatch)?),
        ColumnKind::WideString => CellValue::wide(value.as_str().ok_or_else(mismatch)?),
    };
    Ok(cell)
}
