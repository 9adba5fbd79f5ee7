//! Column metadata shared by every row of a table

use crate::value::CellValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Storage kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    #[default]
    Int32,
    Int64,
    #[serde(rename = "uint32")]
    UInt32,
    #[serde(rename = "uint64")]
    UInt64,
    Float32,
    Float64,
    NarrowString,
    WideString,
}

impl ColumnKind {
    /// Template used when a column is created without an explicit format
    pub fn default_format(self) -> &'static str {
        match self {
            ColumnKind::Int32 => "%d",
            ColumnKind::Int64 => "%lld",
            ColumnKind::UInt32 => "%u",
            ColumnKind::UInt64 => "%llu",
            ColumnKind::Float32 | ColumnKind::Float64 => "%f",
            ColumnKind::NarrowString | ColumnKind::WideString => "%s",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, ColumnKind::NarrowString | ColumnKind::WideString)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Int32 => "int32",
            ColumnKind::Int64 => "int64",
            ColumnKind::UInt32 => "uint32",
            ColumnKind::UInt64 => "uint64",
            ColumnKind::Float32 => "float32",
            ColumnKind::Float64 => "float64",
            ColumnKind::NarrowString => "narrow_string",
            ColumnKind::WideString => "wide_string",
        };
        f.write_str(name)
    }
}

/// Predicate over a single cell's raw value. Expected to be pure.
pub type CellFilter = Arc<dyn Fn(&CellValue) -> bool + Send + Sync>;

/// Wrap a closure as a [`CellFilter`]
pub fn cell_filter<F>(predicate: F) -> CellFilter
where
    F: Fn(&CellValue) -> bool + Send + Sync + 'static,
{
    Arc::new(predicate)
}

/// Static per-column metadata.
///
/// `extra` is carried through to the render surface untouched.
#[derive(Clone, Default)]
pub struct ColumnSchema<E> {
    pub kind: ColumnKind,
    /// printf-style template, only consulted for numeric kinds
    pub format: String,
    pub filter: Option<CellFilter>,
    pub extra: E,
    pub name: String,
}

impl<E: Default> ColumnSchema<E> {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            kind,
            format: kind.default_format().to_string(),
            filter: None,
            extra: E::default(),
            name: name.into(),
        }
    }
}

impl<E> ColumnSchema<E> {
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_extra(mut self, extra: E) -> Self {
        self.extra = extra;
        self
    }

    pub fn with_filter(mut self, filter: CellFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// True when the column has no filter or its filter keeps `value`
    pub fn accepts(&self, value: &CellValue) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(value))
    }
}

impl<E: fmt::Debug> fmt::Debug for ColumnSchema<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSchema")
            .field("kind", &self.kind)
            .field("format", &self.format)
            .field("filter", &self.filter.as_ref().map(|_| "<predicate>"))
            .field("extra", &self.extra)
            .field("name", &self.name)
            .finish()
    }
}

/// Horizontal alignment of a list column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
}

/// Extra column info understood by list-style surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayHints {
    #[serde(default)]
    pub align: Align,
    #[serde(default = "default_width")]
    pub width: u32,
}

fn default_width() -> u32 {
    crate::DEFAULT_COLUMN_WIDTH
}

impl Default for DisplayHints {
    fn default() -> Self {
        Self {
            align: Align::Left,
            width: crate::DEFAULT_COLUMN_WIDTH,
        }
    }
}
