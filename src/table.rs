//! Fixed-column table with upsert rows, per-column filters and a cached sort

use crate::error::Result;
use crate::schema::{CellFilter, ColumnSchema};
use crate::value::CellValue;
use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::io::Write;

/// Caller-chosen row identifier; need not be contiguous
pub type RowId = u64;

/// One cell per column, in column order
pub type Row = Vec<CellValue>;

/// Which filters [`Table::clear_filter`] removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTarget {
    All,
    /// A single column. An index past the last column clears every column.
    Column(usize),
}

impl From<usize> for FilterTarget {
    fn from(col: usize) -> Self {
        FilterTarget::Column(col)
    }
}

impl From<Option<usize>> for FilterTarget {
    fn from(col: Option<usize>) -> Self {
        col.map_or(FilterTarget::All, FilterTarget::Column)
    }
}

/// Typed table with a column count fixed at construction.
///
/// Rows live in a map ordered by [`RowId`]. `sort_by_column` caches an
/// ordering of every row; filters are applied lazily while iterating, so
/// toggling a filter never re-sorts and sorting never looks at filters.
#[derive(Clone, Debug)]
pub struct Table<E> {
    columns: Vec<ColumnSchema<E>>,
    rows: BTreeMap<RowId, Row>,
    sorted: Option<Vec<RowId>>,
    sort_state: Option<(usize, bool)>,
    fallback: ColumnSchema<E>,
}

impl<E: Default> Table<E> {
    /// Create a table with `column_count` default columns
    pub fn new(column_count: usize) -> Self {
        Self::with_columns((0..column_count).map(|_| ColumnSchema::default()).collect())
    }

    /// Create a table whose column count is the number of schemas given
    pub fn with_columns(columns: Vec<ColumnSchema<E>>) -> Self {
        Self {
            columns,
            rows: BTreeMap::new(),
            sorted: None,
            sort_state: None,
            fallback: ColumnSchema::default(),
        }
    }
}

impl<E> Table<E> {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[ColumnSchema<E>] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Number of stored rows, ignoring filters
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.get(&id)
    }

    /// Schema of column `col`, or a default schema when out of range
    pub fn column_schema(&self, col: usize) -> &ColumnSchema<E> {
        self.columns.get(col).unwrap_or(&self.fallback)
    }

    /// Replace the schema of column `col`; out-of-range indices are ignored
    pub fn set_column_schema(&mut self, col: usize, schema: ColumnSchema<E>) {
        let has_rows = !self.rows.is_empty();
        let Some(slot) = self.columns.get_mut(col) else {
            log::debug!("Ignoring schema for column {} (table has {})", col, self.columns.len());
            return;
        };
        if has_rows && slot.kind != schema.kind {
            log::warn!(
                "Column {} changes kind from {} to {} while holding rows",
                col,
                slot.kind,
                schema.kind
            );
        }
        *slot = schema;
    }

    /// Attach a filter to column `col`; out-of-range indices are ignored
    pub fn set_filter(&mut self, col: usize, filter: CellFilter) {
        match self.columns.get_mut(col) {
            Some(schema) => schema.filter = Some(filter),
            None => log::debug!("Ignoring filter for column {} (table has {})", col, self.columns.len()),
        }
    }

    pub fn clear_filter(&mut self, target: impl Into<FilterTarget>) {
        match target.into() {
            FilterTarget::Column(col) if col < self.columns.len() => {
                self.columns[col].filter = None;
            }
            _ => {
                for schema in &mut self.columns {
                    schema.filter = None;
                }
            }
        }
    }

    pub fn has_filters(&self) -> bool {
        self.columns.iter().any(|c| c.filter.is_some())
    }

    /// Insert the row at `id`, replacing any row already stored there.
    ///
    /// Rows are normalized to the column count: extra cells are dropped and
    /// missing ones take the column kind's zero value. Invalidates the sort.
    pub fn upsert_row(&mut self, id: RowId, row: Row) {
        let row = self.normalize_row(id, row);
        self.rows.insert(id, row);
        self.sorted = None;
        self.sort_state = None;
    }

    fn normalize_row(&self, id: RowId, mut row: Row) -> Row {
        let width = self.columns.len();
        if row.len() != width {
            log::warn!("Row {} has {} cells, table has {} columns", id, row.len(), width);
            row.truncate(width);
            while row.len() < width {
                row.push(CellValue::default_for(self.columns[row.len()].kind));
            }
        }

        for (col, (cell, schema)) in row.iter().zip(&self.columns).enumerate() {
            if cell.kind() != schema.kind {
                log::warn!(
                    "Row {} column {} holds {} but column '{}' is {}",
                    id,
                    col,
                    cell.kind(),
                    schema.name,
                    schema.kind
                );
            }
        }
        row
    }

    /// Cache every row ordered by the cell at `col`.
    ///
    /// The sort is stable. A column whose cells do not all share one kind
    /// keeps natural order; an out-of-range column leaves the table untouched.
    pub fn sort_by_column(&mut self, col: usize, ascending: bool) {
        if col >= self.columns.len() {
            log::debug!("Ignoring sort on column {} (table has {})", col, self.columns.len());
            return;
        }

        let mut ids: Vec<RowId> = self.rows.keys().copied().collect();
        if self.has_uniform_kind(col) {
            let rows = &self.rows;
            ids.sort_by(|a, b| {
                let order = rows[a][col].compare(&rows[b][col]).unwrap_or(Ordering::Equal);
                if ascending {
                    order
                } else {
                    order.reverse()
                }
            });
        } else {
            log::debug!("Column {} mixes cell kinds; keeping natural order", col);
        }

        self.sorted = Some(ids);
        self.sort_state = Some((col, ascending));
    }

    fn has_uniform_kind(&self, col: usize) -> bool {
        let mut kinds = self.rows.values().map(|row| row[col].kind());
        match kinds.next() {
            Some(first) => kinds.all(|kind| kind == first),
            None => true,
        }
    }

    /// Column and direction of the cached sort, while it is valid
    pub fn sort_state(&self) -> Option<(usize, bool)> {
        self.sort_state
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted.is_some()
    }

    /// True when every column filter accepts the row
    pub fn is_visible(&self, row: &[CellValue]) -> bool {
        self.columns
            .iter()
            .zip(row)
            .all(|(schema, cell)| schema.accepts(cell))
    }

    /// Lazily iterate the rows that pass every filter, in sorted order when a
    /// sort is cached and in id order otherwise.
    pub fn visible_rows(&self) -> VisibleRows<'_, E> {
        let source = match &self.sorted {
            Some(ids) => RowSource::Sorted(ids.iter()),
            None => RowSource::Natural(self.rows.values()),
        };
        VisibleRows { table: self, source }
    }

    pub fn for_each_visible<F>(&self, mut visit: F)
    where
        F: FnMut(&Row),
    {
        for row in self.visible_rows() {
            visit(row);
        }
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    /// Display strings for each cell of `row`
    pub fn render_row(&self, row: &[CellValue]) -> Vec<String> {
        row.iter()
            .enumerate()
            .map(|(col, cell)| cell.format_narrow(self.columns.get(col)))
            .collect()
    }

    pub fn csv_header(&self) -> String {
        self.column_names().join(",")
    }

    /// Header line followed by one line per visible row. Values are not
    /// quoted, so embedded commas shift columns.
    pub fn csv_lines(&self) -> Vec<String> {
        let mut lines = vec![self.csv_header()];
        lines.extend(self.visible_rows().map(|row| self.render_row(row).join(",")));
        lines
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for line in self.csv_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Write the header and visible rows; returns the number of rows written
    pub fn write_csv<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize> {
        let lines = self.csv_lines();
        for line in &lines {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        Ok(lines.len() - 1)
    }
}

enum RowSource<'a> {
    Sorted(std::slice::Iter<'a, RowId>),
    Natural(btree_map::Values<'a, RowId, Row>),
}

/// Iterator returned by [`Table::visible_rows`]
pub struct VisibleRows<'a, E> {
    table: &'a Table<E>,
    source: RowSource<'a>,
}

impl<'a, E> Iterator for VisibleRows<'a, E> {
    type Item = &'a Row;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match &mut self.source {
                RowSource::Sorted(ids) => {
                    let id = ids.next()?;
                    match self.table.rows.get(id) {
                        Some(row) => row,
                        None => continue,
                    }
                }
                RowSource::Natural(rows) => rows.next()?,
            };
            if self.table.is_visible(row) {
                return Some(row);
            }
        }
    }
}
